//! # Lessonform Nodes
//!
//! Document-node model for interactive lesson content.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ nodes: typed node variants + identity        │
//! │  - Closed union over interactive elements    │
//! │  - Stable uuid identity, ephemeral keys      │
//! │  - Rich-text subtrees (opaque fragments)     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ registry: type → capability dispatch         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ json: persisted document ⇄ node tree         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Closed union**: every node type is a variant of [`LessonNode`];
//!    adding a variant is a compile-time-checked, single-point change
//! 2. **Identity over position**: `uuid` joins content to learner progress
//!    and survives edits; `key` is position-scoped and never persisted
//! 3. **Lenient import**: malformed persisted content is logged and
//!    dropped, never fatal; only programmer errors fail fast

pub mod document;
pub mod error;
pub mod file_kind;
pub mod json;
pub mod key;
pub mod node;
pub mod registry;
pub mod rich_text;

pub use document::{DocumentIntegrity, LessonDocument, RootState};
pub use error::NodeError;
pub use file_kind::FileKind;
pub use json::{export_document, export_node, import_document, import_node};
pub use key::{document_seed, KeyGenerator, NodeKey};
pub use node::{
    FileMetadata, FilePayload, ImagePayload, LessonNode, MatchConceptsPayload, MatchPair,
    NodeId, NodeType, TapToRevealPayload, TrueOrFalsePayload,
};
pub use registry::{NodeRegistry, NodeSpec};
pub use rich_text::RichTextState;
