//! # Document
//!
//! An editable lesson document bound to its storage.
//!
//! Commands apply transactionally: the mutation runs on a working copy of
//! the tree and only a fully successful result is committed back. A failed
//! command leaves the tree, the key generator and the version untouched.

use crate::commands::{Command, CommandResult};
use crate::errors::EditorError;
use crate::selection::Selection;
use lessonform_nodes::{
    export_document, import_document, DocumentIntegrity, KeyGenerator, LessonDocument, NodeRegistry,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Where the document lives
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only, for scratch sessions and tests
    Memory,
    /// Backed by a JSON file on disk
    File { path: PathBuf, dirty: bool },
}

#[derive(Debug)]
pub struct Document {
    tree: LessonDocument,
    storage: DocumentStorage,
    registry: NodeRegistry,
    keys: KeyGenerator,
    version: u64,
    integrity: DocumentIntegrity,
}

impl Document {
    /// Fresh empty in-memory document
    pub fn new() -> Self {
        Self {
            tree: LessonDocument::empty(),
            storage: DocumentStorage::Memory,
            registry: NodeRegistry::with_defaults(),
            keys: KeyGenerator::new("memory"),
            version: 0,
            integrity: DocumentIntegrity::default(),
        }
    }

    /// Build from an already-imported tree. Every node gets a key attached
    /// here, so keys are dense and deterministic per load.
    pub fn from_tree(tree: LessonDocument, registry: NodeRegistry, seed_path: &str) -> Self {
        let mut keys = KeyGenerator::new(seed_path);
        let mut tree = tree;
        for node in tree.children_mut() {
            node.set_key(keys.next_key());
        }

        Self {
            tree,
            storage: DocumentStorage::Memory,
            registry,
            keys,
            version: 0,
            integrity: DocumentIntegrity::default(),
        }
    }

    /// Load a lesson file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let value = serde_json::from_str(&content)?;

        let registry = NodeRegistry::with_defaults();
        let (tree, integrity) = import_document(&registry, &value)?;

        let mut doc = Self::from_tree(tree, registry, &path.to_string_lossy());
        doc.integrity = integrity;
        doc.storage = DocumentStorage::File {
            path: path.to_path_buf(),
            dirty: false,
        };
        Ok(doc)
    }

    /// Load a lesson file, substituting an empty document when the file is
    /// missing or unparseable. Authoring surfaces never hard-fail on a
    /// corrupt lesson; the learner's host does the same on its side.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "falling back to empty document");
                let mut doc = Self::new();
                doc.keys = KeyGenerator::new(&path.to_string_lossy());
                doc.storage = DocumentStorage::File {
                    path: path.to_path_buf(),
                    dirty: false,
                };
                doc
            }
        }
    }

    pub fn tree(&self) -> &LessonDocument {
        &self.tree
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Integrity report from the last load
    pub fn integrity(&self) -> &DocumentIntegrity {
        &self.integrity
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { dirty: true, .. })
    }

    /// Apply a command transactionally.
    ///
    /// The command runs against a copy of the tree and key generator; the
    /// copy replaces the live state only when the whole command succeeds,
    /// and only then does the version advance.
    pub fn apply(
        &mut self,
        command: &Command,
        selection: &Selection,
    ) -> Result<CommandResult, EditorError> {
        let mut working = self.tree.clone();
        let mut keys = self.keys.clone();

        let outcome = command.apply(&mut working, &mut keys, selection)?;

        self.tree = working;
        self.keys = keys;
        self.version += 1;
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }

        Ok(CommandResult {
            version: self.version,
            node_key: outcome.node_key,
            selection: outcome.selection,
        })
    }

    /// Serialize the tree to its persisted JSON form
    pub fn to_json_string(&self) -> Result<String, EditorError> {
        let value = export_document(&self.tree)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Write the document back to its file
    pub fn save(&mut self) -> Result<(), EditorError> {
        let json = self.to_json_string()?;
        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                fs::write(path.as_path(), json)?;
                *dirty = false;
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
