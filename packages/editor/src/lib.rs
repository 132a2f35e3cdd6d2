//! # Lessonform Editor
//!
//! Document lifecycle and the insert/edit command protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ nodes: persisted JSON → lesson node tree    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + commands       │
//! │  - Load/save documents                      │
//! │  - Atomic insert/edit transactions          │
//! │  - Selection-driven insertion placement     │
//! │  - Debounced persistence                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ progress: reveal window + completion        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: commands mutate the node tree; HTML and
//!    reveal windows are derived views
//! 2. **Atomic transactions**: a command commits whole (node + trailing
//!    paragraph + caret move) or not at all
//! 3. **Explicit handles**: every command targets an explicit [`Document`];
//!    there is no ambient "current editor"
//! 4. **Identity preserved**: edit-in-place carries the old node's `uuid`
//!    forward, so learner progress survives content fixes

mod bus;
mod commands;
mod document;
mod errors;
mod save;
mod selection;

pub use bus::{DispatchOutcome, Editor};
pub use commands::{Command, CommandError, CommandResult};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use save::DebouncedSaver;
pub use selection::{Anchor, Selection};

// Re-export the tree types for convenience
pub use lessonform_nodes::{LessonDocument, LessonNode, NodeType};
