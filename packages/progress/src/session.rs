//! # Playback session
//!
//! State machine and derived views for one learner working through one
//! lesson. The session owns the document tree for the duration of playback;
//! the progress map stays owned by the host and is only read here.

use crate::error::ProgressError;
use crate::map::ProgressMap;
use lessonform_nodes::{
    export_node, import_document, DocumentIntegrity, LessonDocument, LessonNode, NodeRegistry,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Where a playback session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// Nothing recorded yet
    NotStarted,
    /// Some tracked nodes played, not all
    InProgress,
    /// Everything played; the completion action is offered but not taken
    AwaitingCompletion,
    /// Learner explicitly completed. Terminal; percentage pins at 100
    Completed,
}

/// How the document is revealed during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealMode {
    /// Gate on the first unplayed tracked node
    #[default]
    Progressive,
    /// No gating; the whole document is visible
    All,
    /// Progressive gating plus an explicit forward-navigation gate flag
    Linear,
}

/// Parse persisted lesson JSON, substituting a canonical empty document
/// when the content is corrupt. The player must always hold a valid tree.
pub fn parse_or_default(registry: &NodeRegistry, content: &str) -> (LessonDocument, DocumentIntegrity) {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(ProgressError::from)
        .and_then(|value| Ok(import_document(registry, &value)?));

    match parsed {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "corrupt lesson content, substituting empty document");
            (LessonDocument::empty(), DocumentIntegrity::default())
        }
    }
}

pub struct PlaybackSession {
    document: LessonDocument,
    mode: RevealMode,
    state: SessionState,
    /// Serialized form of the last applied reveal window
    loaded_window: Option<String>,
}

impl PlaybackSession {
    pub fn new(document: LessonDocument, mode: RevealMode) -> Self {
        Self {
            document,
            mode,
            state: SessionState::NotStarted,
            loaded_window: None,
        }
    }

    pub fn document(&self) -> &LessonDocument {
        &self.document
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    /// Re-derive the session state from the map. `Completed` is terminal
    /// and never leaves, whatever the map does afterwards.
    pub fn sync(&mut self, map: &ProgressMap) -> SessionState {
        if self.state == SessionState::Completed {
            return self.state;
        }

        self.state = if map.is_empty() {
            SessionState::NotStarted
        } else if self.unplayed_tracked(map).is_none() {
            SessionState::AwaitingCompletion
        } else {
            SessionState::InProgress
        };
        self.state
    }

    /// The explicit learner completion action. Only valid once everything
    /// is played; any other state is a no-op.
    pub fn complete(&mut self, map: &ProgressMap) -> SessionState {
        self.sync(map);
        if self.state == SessionState::AwaitingCompletion {
            self.state = SessionState::Completed;
        }
        self.state
    }

    /// Index of the first tracked child with no map entry
    fn unplayed_tracked(&self, map: &ProgressMap) -> Option<usize> {
        self.document
            .children()
            .iter()
            .enumerate()
            .find(|(_, node)| {
                node.is_tracked()
                    && !node.uuid().map(|uuid| map.contains(uuid)).unwrap_or(false)
            })
            .map(|(index, _)| index)
    }

    /// End of the reveal window, exclusive, as an index into the top-level
    /// children.
    ///
    /// Progressive reveal shows everything up to and including the first
    /// unplayed tracked node. With an empty map that is the first tracked
    /// node; with nothing unplayed it is the whole document.
    fn window_end(&self, map: &ProgressMap) -> usize {
        let child_count = self.document.children().len();
        match self.mode {
            RevealMode::All => child_count,
            RevealMode::Progressive | RevealMode::Linear => self
                .unplayed_tracked(map)
                .map(|index| index + 1)
                .unwrap_or(child_count),
        }
    }

    /// Currently revealed prefix of the document
    pub fn reveal_window(&self, map: &ProgressMap) -> &[LessonNode] {
        &self.document.children()[..self.window_end(map)]
    }

    /// Whether forward navigation is gated right now. Only meaningful in
    /// linear mode; progressive reveal gates by hiding content instead.
    pub fn is_forward_gated(&self, map: &ProgressMap) -> bool {
        self.mode == RevealMode::Linear
            && self.window_end(map) < self.document.children().len()
    }

    /// Recompute the reveal window and report whether the host must reload
    /// its editor state.
    ///
    /// Returns the window only when its serialized content differs from the
    /// last applied one; `None` means nothing changed and the host must not
    /// touch the loaded state (avoids scroll jumps and history churn).
    pub fn apply_reveal(
        &mut self,
        map: &ProgressMap,
    ) -> Result<Option<Vec<LessonNode>>, ProgressError> {
        let end = self.window_end(map);
        let window = &self.document.children()[..end];

        let serialized = serialize_window(window)?;
        if self.loaded_window.as_deref() == Some(serialized.as_str()) {
            return Ok(None);
        }

        self.loaded_window = Some(serialized);
        Ok(Some(window.to_vec()))
    }

    /// Completion percentage in [0, 100].
    ///
    /// Counts every typed node in the tree, descending into rich-text
    /// children; completed blocks are the nodes strictly before the last
    /// played tracked node in document order. An empty document is 0, and
    /// a completed session is always 100.
    pub fn completion_percentage(&self, map: &ProgressMap) -> u8 {
        if self.state == SessionState::Completed {
            return 100;
        }

        let total_blocks = self.document.block_count();
        if total_blocks == 0 {
            return 0;
        }

        let last_played = self
            .document
            .children()
            .iter()
            .rposition(|node| {
                node.is_tracked()
                    && node.uuid().map(|uuid| map.contains(uuid)).unwrap_or(false)
            });

        let completed_blocks: usize = match last_played {
            Some(position) => self.document.children()[..position]
                .iter()
                .map(LessonNode::block_count)
                .sum(),
            None => 0,
        };

        let percentage = (completed_blocks as f64 / total_blocks as f64 * 100.0).round();
        percentage.clamp(0.0, 100.0) as u8
    }
}

fn serialize_window(window: &[LessonNode]) -> Result<String, ProgressError> {
    let values: Vec<Value> = window
        .iter()
        .map(export_node)
        .collect::<Result<_, _>>()?;
    Ok(serde_json::to_string(&Value::Array(values))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonform_nodes::NodeType;

    #[test]
    fn test_all_mode_ignores_gating() {
        let document = LessonDocument::from_children(vec![
            LessonNode::page_break(),
            LessonNode::page_break(),
        ]);
        let session = PlaybackSession::new(document, RevealMode::All);

        assert_eq!(session.reveal_window(&ProgressMap::new()).len(), 2);
        assert!(!session.is_forward_gated(&ProgressMap::new()));
    }

    #[test]
    fn test_linear_mode_reports_gate() {
        let document = LessonDocument::from_children(vec![
            LessonNode::page_break(),
            LessonNode::empty_paragraph(),
        ]);
        let session = PlaybackSession::new(document, RevealMode::Linear);

        let map = ProgressMap::new();
        assert_eq!(session.reveal_window(&map).len(), 1);
        assert_eq!(session.reveal_window(&map)[0].node_type(), NodeType::PageBreak);
        assert!(session.is_forward_gated(&map));
    }

    #[test]
    fn test_empty_document_percentage_is_zero() {
        let mut session = PlaybackSession::new(LessonDocument::empty(), RevealMode::Progressive);
        let map = ProgressMap::new();
        // block_count of an empty document still includes the root, so the
        // division guard and the no-played-nodes path both land on 0
        assert_eq!(session.completion_percentage(&map), 0);
        assert_eq!(session.sync(&map), SessionState::NotStarted);
    }
}
