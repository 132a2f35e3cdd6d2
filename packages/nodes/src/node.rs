//! # Lesson Nodes
//!
//! The closed union of document node kinds.
//!
//! ## Design Principles
//!
//! 1. **Closed union**: every consumer pattern-matches exhaustively, so a
//!    new variant is a compile-time-checked, single-point change
//! 2. **Identity is data**: `uuid` is generated once at creation and
//!    survives replace/clone; `key` is assigned at attach time and is
//!    never semantic
//! 3. **Host blocks pass through**: plain rich-text blocks (paragraphs,
//!    headings) are carried opaquely: counted by traversals, never
//!    tracked for progress

use crate::file_kind::FileKind;
use crate::key::NodeKey;
use crate::rich_text::RichTextState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminant tag for node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    TrueOrFalse,
    TapToReveal,
    MatchConcepts,
    File,
    Image,
    PageBreak,
    /// Host-framework rich-text block; never serialized under this tag
    RichText,
}

impl NodeType {
    /// The custom interactive kinds this crate owns (registry domain)
    pub const CUSTOM: [NodeType; 6] = [
        NodeType::TrueOrFalse,
        NodeType::TapToReveal,
        NodeType::MatchConcepts,
        NodeType::File,
        NodeType::Image,
        NodeType::PageBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::TrueOrFalse => "true-or-false",
            NodeType::TapToReveal => "tap-to-reveal",
            NodeType::MatchConcepts => "match-concepts",
            NodeType::File => "file",
            NodeType::Image => "image",
            NodeType::PageBreak => "page-break",
            NodeType::RichText => "rich-text",
        }
    }

    pub fn from_tag(tag: &str) -> Option<NodeType> {
        match tag {
            "true-or-false" => Some(NodeType::TrueOrFalse),
            "tap-to-reveal" => Some(NodeType::TapToReveal),
            "match-concepts" => Some(NodeType::MatchConcepts),
            "file" => Some(NodeType::File),
            "image" => Some(NodeType::Image),
            "page-break" => Some(NodeType::PageBreak),
            _ => None,
        }
    }

    /// Kinds counted toward completion and reveal gating
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            NodeType::TrueOrFalse
                | NodeType::TapToReveal
                | NodeType::MatchConcepts
                | NodeType::PageBreak
        )
    }
}

fn default_schema_version() -> u32 {
    1
}

/// Identity carried by every custom node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeId {
    /// Stable identity; the join key between content and learner progress
    pub uuid: Uuid,

    /// Ephemeral tree-position key; assigned at attach, never persisted
    #[serde(skip)]
    pub key: NodeKey,

    /// Per-type schema-evolution counter
    #[serde(default = "default_schema_version")]
    pub version: u32,
}

impl NodeId {
    /// Fresh identity for a newly created node
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            key: NodeKey::new(),
            version: 1,
        }
    }

    /// Identity carried forward from an existing node (edit-in-place)
    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            key: NodeKey::new(),
            version: 1,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueOrFalsePayload {
    pub question_state: RichTextState,
    pub correct_answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Legacy documents predate explanations; absent means empty
    #[serde(default)]
    pub explanation_state: RichTextState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapToRevealPayload {
    pub front_side_state: RichTextState,
    pub back_side_state: RichTextState,
}

/// One concept/definition pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub item: RichTextState,
    pub value: RichTextState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConceptsPayload {
    pub title: RichTextState,
    pub items: Vec<MatchPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub file_type: FileKind,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub src: String,
    #[serde(default)]
    pub alt_text: String,
    pub metadata: FileMetadata,
}

/// Course-asset image; bytes resolved later by `file_id` lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub file_id: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// A typed, serializable unit of lesson content
#[derive(Debug, Clone, PartialEq)]
pub enum LessonNode {
    TrueOrFalse {
        id: NodeId,
        payload: TrueOrFalsePayload,
    },
    TapToReveal {
        id: NodeId,
        payload: TapToRevealPayload,
    },
    MatchConcepts {
        id: NodeId,
        payload: MatchConceptsPayload,
    },
    File {
        id: NodeId,
        payload: FilePayload,
    },
    Image {
        id: NodeId,
        payload: ImagePayload,
    },
    /// Structural/progress checkpoint; no payload beyond identity
    PageBreak { id: NodeId },
    /// Opaque host-framework block (paragraph, heading, list, ...)
    RichText { key: NodeKey, state: RichTextState },
}

impl LessonNode {
    pub fn true_or_false(payload: TrueOrFalsePayload) -> Self {
        LessonNode::TrueOrFalse {
            id: NodeId::new(),
            payload,
        }
    }

    pub fn tap_to_reveal(payload: TapToRevealPayload) -> Self {
        LessonNode::TapToReveal {
            id: NodeId::new(),
            payload,
        }
    }

    pub fn match_concepts(payload: MatchConceptsPayload) -> Self {
        LessonNode::MatchConcepts {
            id: NodeId::new(),
            payload,
        }
    }

    pub fn file(payload: FilePayload) -> Self {
        LessonNode::File {
            id: NodeId::new(),
            payload,
        }
    }

    pub fn image(payload: ImagePayload) -> Self {
        LessonNode::Image {
            id: NodeId::new(),
            payload,
        }
    }

    pub fn page_break() -> Self {
        LessonNode::PageBreak { id: NodeId::new() }
    }

    pub fn rich_text(state: RichTextState) -> Self {
        LessonNode::RichText {
            key: NodeKey::new(),
            state,
        }
    }

    /// An empty paragraph block, as appended after every insertion
    pub fn empty_paragraph() -> Self {
        let mut para = RichTextState::empty_root();
        para.children.clear();
        para.kind = "paragraph".to_string();
        Self::rich_text(para)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            LessonNode::TrueOrFalse { .. } => NodeType::TrueOrFalse,
            LessonNode::TapToReveal { .. } => NodeType::TapToReveal,
            LessonNode::MatchConcepts { .. } => NodeType::MatchConcepts,
            LessonNode::File { .. } => NodeType::File,
            LessonNode::Image { .. } => NodeType::Image,
            LessonNode::PageBreak { .. } => NodeType::PageBreak,
            LessonNode::RichText { .. } => NodeType::RichText,
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.node_type().is_tracked()
    }

    /// Stable identity; `None` for host rich-text blocks
    pub fn uuid(&self) -> Option<Uuid> {
        self.id().map(|id| id.uuid)
    }

    pub fn id(&self) -> Option<&NodeId> {
        match self {
            LessonNode::TrueOrFalse { id, .. }
            | LessonNode::TapToReveal { id, .. }
            | LessonNode::MatchConcepts { id, .. }
            | LessonNode::File { id, .. }
            | LessonNode::Image { id, .. }
            | LessonNode::PageBreak { id } => Some(id),
            LessonNode::RichText { .. } => None,
        }
    }

    pub fn key(&self) -> &NodeKey {
        match self {
            LessonNode::TrueOrFalse { id, .. }
            | LessonNode::TapToReveal { id, .. }
            | LessonNode::MatchConcepts { id, .. }
            | LessonNode::File { id, .. }
            | LessonNode::Image { id, .. }
            | LessonNode::PageBreak { id } => &id.key,
            LessonNode::RichText { key, .. } => key,
        }
    }

    pub fn set_key(&mut self, new_key: NodeKey) {
        match self {
            LessonNode::TrueOrFalse { id, .. }
            | LessonNode::TapToReveal { id, .. }
            | LessonNode::MatchConcepts { id, .. }
            | LessonNode::File { id, .. }
            | LessonNode::Image { id, .. }
            | LessonNode::PageBreak { id } => id.key = new_key,
            LessonNode::RichText { key, .. } => *key = new_key,
        }
    }

    /// Carry another node's identity forward (replace-in-place flows).
    ///
    /// Copies `uuid` and `key` when both sides carry an identity; copies
    /// only the key between host blocks.
    pub fn adopt_identity(&mut self, source: &LessonNode) {
        let source_key = source.key().clone();
        if let (Some(_), Some(source_id)) = (self.id(), source.id()) {
            let uuid = source_id.uuid;
            match self {
                LessonNode::TrueOrFalse { id, .. }
                | LessonNode::TapToReveal { id, .. }
                | LessonNode::MatchConcepts { id, .. }
                | LessonNode::File { id, .. }
                | LessonNode::Image { id, .. }
                | LessonNode::PageBreak { id } => {
                    id.uuid = uuid;
                    id.key = source_key;
                }
                LessonNode::RichText { .. } => unreachable!("id() returned Some for RichText"),
            }
        } else {
            self.set_key(source_key);
        }
    }

    /// Plain-text rendering of the node.
    ///
    /// Page breaks yield a single newline so whole-document text extraction
    /// keeps a visual break without losing content length guarantees.
    pub fn text_content(&self) -> String {
        match self {
            LessonNode::TrueOrFalse { payload, .. } => payload.question_state.plain_text(),
            LessonNode::TapToReveal { payload, .. } => {
                let front = payload.front_side_state.plain_text();
                let back = payload.back_side_state.plain_text();
                format!("{}\n{}", front, back)
            }
            LessonNode::MatchConcepts { payload, .. } => {
                let mut out = payload.title.plain_text();
                for pair in &payload.items {
                    out.push('\n');
                    out.push_str(&pair.item.plain_text());
                    out.push_str(": ");
                    out.push_str(&pair.value.plain_text());
                }
                out
            }
            LessonNode::File { payload, .. } => payload.alt_text.clone(),
            LessonNode::Image { payload, .. } => payload.alt_text.clone(),
            LessonNode::PageBreak { .. } => "\n".to_string(),
            LessonNode::RichText { state, .. } => state.plain_text(),
        }
    }

    /// Recursive typed-node count: the node itself plus every node of its
    /// rich-text payload subtrees
    pub fn block_count(&self) -> usize {
        match self {
            LessonNode::TrueOrFalse { payload, .. } => {
                1 + payload.question_state.block_count() + payload.explanation_state.block_count()
            }
            LessonNode::TapToReveal { payload, .. } => {
                1 + payload.front_side_state.block_count() + payload.back_side_state.block_count()
            }
            LessonNode::MatchConcepts { payload, .. } => {
                1 + payload.title.block_count()
                    + payload
                        .items
                        .iter()
                        .map(|pair| pair.item.block_count() + pair.value.block_count())
                        .sum::<usize>()
            }
            LessonNode::File { .. } | LessonNode::Image { .. } | LessonNode::PageBreak { .. } => 1,
            LessonNode::RichText { state, .. } => state.block_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::RichTextState;
    use pretty_assertions::assert_eq;

    fn question() -> TrueOrFalsePayload {
        TrueOrFalsePayload {
            question_state: RichTextState::paragraph_root("Water boils at 100C"),
            correct_answer: true,
            hint: None,
            explanation_state: RichTextState::paragraph_root("At sea level"),
        }
    }

    #[test]
    fn test_fresh_nodes_get_distinct_uuids() {
        let a = LessonNode::true_or_false(question());
        let b = LessonNode::true_or_false(question());
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_clone_preserves_identity_without_sharing() {
        let original = LessonNode::true_or_false(question());
        let mut copy = original.clone();

        assert_eq!(copy.uuid(), original.uuid());
        assert_eq!(copy.key(), original.key());

        // Value semantics: mutating the copy leaves the original intact
        if let LessonNode::TrueOrFalse { payload, .. } = &mut copy {
            payload.correct_answer = false;
        }
        if let LessonNode::TrueOrFalse { payload, .. } = &original {
            assert!(payload.correct_answer);
        }
    }

    #[test]
    fn test_adopt_identity_carries_uuid_and_key() {
        let mut old = LessonNode::true_or_false(question());
        old.set_key("seed-7".to_string());

        let mut replacement = LessonNode::true_or_false(TrueOrFalsePayload {
            correct_answer: false,
            ..question()
        });
        replacement.adopt_identity(&old);

        assert_eq!(replacement.uuid(), old.uuid());
        assert_eq!(replacement.key(), "seed-7");
    }

    #[test]
    fn test_page_break_text_content_is_newline() {
        assert_eq!(LessonNode::page_break().text_content(), "\n");
    }

    #[test]
    fn test_tracked_types() {
        assert!(LessonNode::page_break().is_tracked());
        assert!(LessonNode::true_or_false(question()).is_tracked());
        assert!(!LessonNode::empty_paragraph().is_tracked());
        assert!(!LessonNode::image(ImagePayload {
            file_id: "f1".into(),
            alt_text: String::new(),
            width: None,
            height: None,
            max_width: None,
            blur_hash: None,
            object_fit: None,
            aspect_ratio: None,
        })
        .is_tracked());
    }

    #[test]
    fn test_block_count_descends_into_payload_subtrees() {
        let node = LessonNode::true_or_false(question());
        // 1 (node) + 3 (question root/para/text) + 3 (explanation)
        assert_eq!(node.block_count(), 7);

        assert_eq!(LessonNode::page_break().block_count(), 1);
        // bare paragraph block
        assert_eq!(LessonNode::empty_paragraph().block_count(), 1);
    }

    #[test]
    fn test_node_type_tags_round_trip() {
        for node_type in NodeType::CUSTOM {
            assert_eq!(NodeType::from_tag(node_type.as_str()), Some(node_type));
        }
        assert_eq!(NodeType::from_tag("paragraph"), None);
    }
}
