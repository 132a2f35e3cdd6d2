//! # Command bus
//!
//! Routes commands to the plugins mounted on an editor. A plugin here is
//! the handler registration for one custom node type; commands for types
//! without a mounted plugin are reported as unhandled rather than silently
//! dropped, so a host can layer its own fallback handlers.

use crate::commands::{Command, CommandResult};
use crate::document::Document;
use crate::errors::EditorError;
use crate::selection::Selection;
use lessonform_nodes::NodeType;
use std::collections::HashSet;

/// What the bus did with a dispatched command
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A mounted plugin handled the command
    Handled(CommandResult),
    /// No plugin is mounted for the command's node type
    Unhandled,
}

pub struct Editor {
    document: Document,
    plugins: HashSet<NodeType>,
    selection: Selection,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            plugins: HashSet::new(),
            selection: Selection::None,
        }
    }

    /// Editor with every built-in node plugin mounted
    pub fn with_default_plugins(document: Document) -> Result<Self, EditorError> {
        let mut editor = Self::new(document);
        for node_type in lessonform_nodes::NodeType::CUSTOM {
            editor.register_plugin(node_type)?;
        }
        Ok(editor)
    }

    /// Mount the plugin for one node type.
    ///
    /// Fails fast when the document's registry has no spec for the type.
    /// Mounting a plugin the registry cannot back would defer the failure
    /// to the first command, where it is much harder to diagnose.
    pub fn register_plugin(&mut self, node_type: NodeType) -> Result<(), EditorError> {
        if !self.document.registry().contains(node_type) {
            return Err(EditorError::NodeTypeNotRegistered(node_type));
        }
        self.plugins.insert(node_type);
        Ok(())
    }

    pub fn has_plugin(&self, node_type: NodeType) -> bool {
        self.plugins.contains(&node_type)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Dispatch a command through the bus.
    ///
    /// The caret tracks the command's resulting selection on success.
    pub fn dispatch(&mut self, command: &Command) -> Result<DispatchOutcome, EditorError> {
        if !self.plugins.contains(&command.node_type()) {
            return Ok(DispatchOutcome::Unhandled);
        }

        let result = self.document.apply(command, &self.selection)?;
        self.selection = result.selection;
        Ok(DispatchOutcome::Handled(result))
    }
}
