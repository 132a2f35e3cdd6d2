//! # Lessonform Progress
//!
//! Playback-side view of a lesson: who has played what, what is revealed,
//! and how far along the learner is.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ ProgressMap: uuid → recorded outcome        │
//! │  (owned by the host app, read-only here)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PlaybackSession                             │
//! │  - NotStarted → InProgress →                │
//! │    AwaitingCompletion → Completed           │
//! │  - Reveal window over document children     │
//! │  - Completion percentage                    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The map is the truth**: reveal and completion derive from the
//!    document tree plus uuid lookups into the map, never from node content
//! 2. **Read-only engine**: this crate never writes progress entries; the
//!    host records interactions through its own backend
//! 3. **Idempotent recompute**: re-applying an unchanged reveal window is a
//!    no-op, detected by serialized-form equality

mod error;
mod map;
mod session;

pub use error::ProgressError;
pub use map::{InteractionPayload, ProgressEntry, ProgressMap, INTENT_RECORD_PROGRESS};
pub use session::{parse_or_default, PlaybackSession, RevealMode, SessionState};
