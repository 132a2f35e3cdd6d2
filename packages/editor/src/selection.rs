//! Selection model
//!
//! The host editing framework owns real selection (text offsets, ranges);
//! commands only need to know where the caret sits relative to top-level
//! blocks, so the model here is the anchor's block position plus what kind
//! of node anchors it.

use serde::{Deserialize, Serialize};

/// Where a range selection is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Anchor {
    /// Inside a text node; `block_index` is its top-level block ancestor
    Text { block_index: usize },
    /// At an inline non-text node (mention, inline image, ...)
    Inline { block_index: usize },
    /// Directly at a block-level node
    Block { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Selection {
    /// No valid range selection
    #[default]
    None,
    Range { anchor: Anchor },
}

impl Selection {
    pub fn caret_in_text(block_index: usize) -> Self {
        Selection::Range {
            anchor: Anchor::Text { block_index },
        }
    }

    pub fn at_block(index: usize) -> Self {
        Selection::Range {
            anchor: Anchor::Block { index },
        }
    }

    /// Top-level index a new node should be inserted at.
    ///
    /// Fallback chain, in order of preference: after the anchor's top-level
    /// block ancestor (text or inline anchors), after the anchored block
    /// itself, else append at document end.
    pub fn insertion_index(&self, child_count: usize) -> usize {
        match self {
            Selection::Range {
                anchor: Anchor::Text { block_index },
            }
            | Selection::Range {
                anchor: Anchor::Inline { block_index },
            } => (block_index + 1).min(child_count),
            Selection::Range {
                anchor: Anchor::Block { index },
            } => (index + 1).min(child_count),
            Selection::None => child_count,
        }
    }
}
