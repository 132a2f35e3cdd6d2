//! Node type registry
//!
//! Maps each [`NodeType`] discriminant to its capability bundle. Adding an
//! interactive element kind means registering one new bundle; consumers
//! dispatch here and need no modification.
//!
//! Failure semantics: an unknown `type` tag during import is a typed
//! "unsupported node" miss ([`NodeError::UnsupportedType`]), never a crash.
//! Whether to skip, substitute a placeholder, or abort is the caller's
//! policy, not the registry's.

use crate::document::DocumentIntegrity;
use crate::error::NodeError;
use crate::json;
use crate::node::{LessonNode, NodeType};
use serde_json::Value;
use std::collections::HashMap;

/// Import one node from its persisted object form
pub type ImportJsonFn = fn(&Value, &mut DocumentIntegrity) -> Result<LessonNode, NodeError>;

/// Capability bundle for one node kind
pub struct NodeSpec {
    pub node_type: NodeType,
    /// Current schema version emitted on export
    pub schema_version: u32,
    pub import_json: ImportJsonFn,
    pub export_json: fn(&LessonNode) -> Result<Value, NodeError>,
    /// Structurally independent copy preserving `uuid` and `key`
    pub clone_node: fn(&LessonNode) -> LessonNode,
    /// Render fallback when no richer surface is available
    pub text_content: fn(&LessonNode) -> String,
}

impl std::fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeSpec")
            .field("node_type", &self.node_type)
            .field("schema_version", &self.schema_version)
            .finish()
    }
}

fn clone_node(node: &LessonNode) -> LessonNode {
    node.clone()
}

fn text_content(node: &LessonNode) -> String {
    node.text_content()
}

/// Registry of the custom node kinds attached to a document
#[derive(Debug)]
pub struct NodeRegistry {
    specs: HashMap<NodeType, NodeSpec>,
}

impl NodeRegistry {
    /// An empty registry (for documents that opt out of defaults)
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Registry covering every custom kind this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for node_type in NodeType::CUSTOM {
            // Exhaustive on purpose: a new variant must pick its importer here
            let import_json: ImportJsonFn = match node_type {
                NodeType::TrueOrFalse => json::import_true_or_false,
                NodeType::TapToReveal => json::import_tap_to_reveal,
                NodeType::MatchConcepts => json::import_match_concepts,
                NodeType::File => json::import_file,
                NodeType::Image => json::import_image,
                NodeType::PageBreak => json::import_page_break,
                NodeType::RichText => unreachable!("host blocks are not registered"),
            };
            registry.register(NodeSpec {
                node_type,
                schema_version: 1,
                import_json,
                export_json: json::export_node,
                clone_node,
                text_content,
            });
        }
        registry
    }

    pub fn register(&mut self, spec: NodeSpec) {
        self.specs.insert(spec.node_type, spec);
    }

    pub fn contains(&self, node_type: NodeType) -> bool {
        self.specs.contains_key(&node_type)
    }

    pub fn spec(&self, node_type: NodeType) -> Option<&NodeSpec> {
        self.specs.get(&node_type)
    }

    /// Reconstruct a node from its persisted form via tag dispatch
    pub fn import_json(
        &self,
        value: &Value,
        integrity: &mut DocumentIntegrity,
    ) -> Result<LessonNode, NodeError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| NodeError::InvalidShape("node has no type tag".into()))?;

        let node_type = NodeType::from_tag(tag)
            .filter(|node_type| self.contains(*node_type))
            .ok_or_else(|| NodeError::UnsupportedType(tag.to_string()))?;

        let spec = self
            .spec(node_type)
            .ok_or_else(|| NodeError::UnsupportedType(tag.to_string()))?;
        (spec.import_json)(value, integrity)
    }

    /// Serialize a node via its registered bundle
    pub fn export_json(&self, node: &LessonNode) -> Result<Value, NodeError> {
        match self.spec(node.node_type()) {
            Some(spec) => (spec.export_json)(node),
            // Host blocks are not registered but still serialize
            None if node.node_type() == NodeType::RichText => json::export_node(node),
            None => Err(NodeError::UnsupportedType(
                node.node_type().as_str().to_string(),
            )),
        }
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
