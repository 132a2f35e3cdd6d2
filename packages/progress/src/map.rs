//! # Progress map
//!
//! Per-learner record of played nodes, keyed by node uuid. The map grows
//! monotonically during normal playback and its insertion order is the
//! order interactions were recorded in, which persisted JSON must keep.
//! `serde_json`'s default map type reorders keys, so (de)serialization is
//! hand-written over the entry list.

use crate::error::ProgressError;
use chrono::{DateTime, Utc};
use lessonform_nodes::NodeType;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Form-field intent for the record-interaction endpoint
pub const INTENT_RECORD_PROGRESS: &str = "record-progress";

/// One recorded interaction outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Type-specific outcome fields (selected answer, matched pairs, ...)
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// Insertion-ordered map of node uuid to recorded outcome
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressMap {
    entries: Vec<(Uuid, ProgressEntry)>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.entries.iter().any(|(key, _)| *key == uuid)
    }

    pub fn get(&self, uuid: Uuid) -> Option<&ProgressEntry> {
        self.entries
            .iter()
            .find(|(key, _)| *key == uuid)
            .map(|(_, entry)| entry)
    }

    /// Record an outcome. Re-recording an already-played node replaces the
    /// outcome but keeps the original position, so insertion order stays
    /// the order nodes were first played in.
    pub fn insert(&mut self, uuid: Uuid, entry: ProgressEntry) {
        match self.entries.iter_mut().find(|(key, _)| *key == uuid) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((uuid, entry)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, &ProgressEntry)> {
        self.entries.iter().map(|(key, entry)| (*key, entry))
    }

    /// Uuid of the most recently first-played node
    pub fn last_recorded(&self) -> Option<Uuid> {
        self.entries.last().map(|(key, _)| *key)
    }
}

impl Serialize for ProgressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProgressMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = ProgressMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of node uuid to progress entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ProgressMap::new();
                while let Some((key, entry)) = access.next_entry::<Uuid, ProgressEntry>()? {
                    map.insert(key, entry);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Interaction outcome as submitted to the per-lesson endpoint.
///
/// The transport is a form-encoded `intent` + `payload` pair; only the
/// encoding lives here, the HTTP call belongs to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionPayload {
    pub uuid: Uuid,
    pub node_type: NodeType,
    #[serde(flatten)]
    pub outcome: Value,
    pub timestamp: DateTime<Utc>,
}

impl InteractionPayload {
    pub fn new(uuid: Uuid, node_type: NodeType, outcome: Value) -> Self {
        Self {
            uuid,
            node_type,
            outcome,
            timestamp: Utc::now(),
        }
    }

    /// Form fields for the record endpoint
    pub fn to_form_pairs(&self) -> Result<Vec<(String, String)>, ProgressError> {
        Ok(vec![
            ("intent".to_string(), INTENT_RECORD_PROGRESS.to_string()),
            ("payload".to_string(), serde_json::to_string(self)?),
        ])
    }

    /// The map entry equivalent of this interaction
    pub fn to_entry(&self) -> ProgressEntry {
        ProgressEntry {
            node_type: self.node_type,
            payload: self.outcome.clone(),
            timestamp: self.timestamp,
        }
    }
}
