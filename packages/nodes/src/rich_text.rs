//! Rich-text fragments
//!
//! A [`RichTextState`] is a serializable rich-text subtree: nested nodes
//! with `children`, `direction`, `format` and `indent`. Interactive nodes
//! embed these for their prose payloads (question text, card faces, match
//! items). The progress engine treats them as opaque except for traversal
//! and counting, so unknown fields are preserved verbatim through `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_version() -> u32 {
    1
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// One node of a rich-text subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextState {
    /// Node kind tag (`root`, `paragraph`, `text`, `linebreak`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RichTextState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Formatting flags; a string for element nodes, a bitmask for text
    /// nodes, so it is carried as a raw value
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub format: Value,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub indent: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default = "default_version")]
    pub version: u32,

    /// Fields this model does not interpret (`mode`, `style`, `detail`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichTextState {
    fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            children: Vec::new(),
            direction: None,
            format: Value::Null,
            indent: 0,
            text: None,
            version: 1,
            extra: Map::new(),
        }
    }

    /// An empty editor-state root (one empty paragraph)
    pub fn empty_root() -> Self {
        let mut root = Self::bare("root");
        root.children.push(Self::bare("paragraph"));
        root
    }

    /// A root holding a single paragraph of plain text
    pub fn paragraph_root(text: impl Into<String>) -> Self {
        let mut leaf = Self::bare("text");
        leaf.text = Some(text.into());

        let mut para = Self::bare("paragraph");
        para.children.push(leaf);

        let mut root = Self::bare("root");
        root.children.push(para);
        root
    }

    /// Recursive node count, this node included.
    ///
    /// Every node in a fragment carries a `type` tag, so this is a raw
    /// count of the subtree.
    pub fn block_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RichTextState::block_count)
            .sum::<usize>()
    }

    /// Concatenated text content of the subtree
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        if self.kind == "linebreak" {
            out.push('\n');
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Shape check used by lenient importers: a fragment must be a JSON
    /// object carrying a string `type` tag.
    pub fn is_valid_fragment(value: &Value) -> bool {
        value
            .as_object()
            .and_then(|obj| obj.get("type"))
            .map(Value::is_string)
            .unwrap_or(false)
    }

    /// Parse a fragment from a raw value, or `None` when the shape check
    /// fails
    pub fn from_value(value: &Value) -> Option<Self> {
        if !Self::is_valid_fragment(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

impl Default for RichTextState {
    fn default() -> Self {
        Self::empty_root()
    }
}
