//! Persisted lesson document tree
//!
//! The durable representation is a rooted, ordered tree:
//! `{ root: { children: [...], direction, format, indent, type: "root",
//! version } }`. Top-level children are [`LessonNode`]s.

use crate::key::NodeKey;
use crate::node::LessonNode;
use serde_json::Value;
use uuid::Uuid;

/// Root element state (everything but the children is carried opaquely)
#[derive(Debug, Clone, PartialEq)]
pub struct RootState {
    pub children: Vec<LessonNode>,
    pub direction: Option<String>,
    pub format: Value,
    pub indent: i64,
    pub version: u32,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            direction: None,
            format: Value::Null,
            indent: 0,
            version: 1,
        }
    }
}

/// An ordered rooted tree of lesson nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonDocument {
    pub root: RootState,
}

/// Recovered-but-noted defects found while importing persisted content.
///
/// Import never fails on malformed units; it drops or substitutes and
/// counts here so authoring surfaces can warn without breaking playback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentIntegrity {
    /// Match-concepts items dropped for failing the fragment shape check
    pub dropped_match_items: usize,
    /// Custom nodes skipped because their payload failed to parse
    pub malformed_nodes: usize,
    /// Children skipped because they carry no `type` tag at all
    pub untyped_nodes: usize,
}

impl DocumentIntegrity {
    pub fn is_clean(&self) -> bool {
        self == &Self::default()
    }
}

impl LessonDocument {
    /// Canonical empty document (the substitute for corrupt persisted JSON)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_children(children: Vec<LessonNode>) -> Self {
        Self {
            root: RootState {
                children,
                ..RootState::default()
            },
        }
    }

    pub fn children(&self) -> &[LessonNode] {
        &self.root.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<LessonNode> {
        &mut self.root.children
    }

    pub fn find_by_key(&self, key: &str) -> Option<&LessonNode> {
        self.root.children.iter().find(|node| node.key() == key)
    }

    pub fn find_by_uuid(&self, uuid: Uuid) -> Option<&LessonNode> {
        self.root
            .children
            .iter()
            .find(|node| node.uuid() == Some(uuid))
    }

    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.root.children.iter().position(|node| node.key() == key)
    }

    /// Top-level children of tracked kinds, in document order
    pub fn tracked_nodes(&self) -> impl Iterator<Item = &LessonNode> {
        self.root.children.iter().filter(|node| node.is_tracked())
    }

    /// Stable identities present in the tree, in document order
    pub fn uuids(&self) -> Vec<Uuid> {
        self.root.children.iter().filter_map(LessonNode::uuid).collect()
    }

    /// Raw typed-node count over the whole tree, root included, descending
    /// into rich-text subtrees
    pub fn block_count(&self) -> usize {
        1 + self
            .root
            .children
            .iter()
            .map(LessonNode::block_count)
            .sum::<usize>()
    }

    /// Plain-text rendering of the whole document
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.root.children.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&node.text_content());
        }
        out
    }

    pub fn keys(&self) -> Vec<NodeKey> {
        self.root
            .children
            .iter()
            .map(|node| node.key().clone())
            .collect()
    }
}
