//! JSON serialization boundary
//!
//! Every node exports as `{ uuid, type, version, <payload> }`; `version`
//! is a per-type schema-evolution counter. Import is the strict inverse,
//! with legacy gaps back-filled (missing `fileType` recomputed from `src`,
//! missing `version` treated as 1, missing `uuid` regenerated).
//!
//! Import is lenient toward persisted content: a malformed unit is logged
//! and dropped or substituted, never fatal. Only the shape of the request
//! itself (non-object node, missing `type`) is an error, and the document
//! importer recovers from that too.

use crate::document::{DocumentIntegrity, LessonDocument, RootState};
use crate::error::NodeError;
use crate::file_kind::FileKind;
use crate::node::{
    FileMetadata, FilePayload, ImagePayload, LessonNode, MatchConceptsPayload, MatchPair, NodeId,
    TapToRevealPayload, TrueOrFalsePayload,
};
use crate::registry::NodeRegistry;
use crate::rich_text::RichTextState;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Export

/// Serialize one node to its persisted object form
pub fn export_node(node: &LessonNode) -> Result<Value, NodeError> {
    match node {
        LessonNode::TrueOrFalse { id, payload } => tagged(node, id, payload),
        LessonNode::TapToReveal { id, payload } => tagged(node, id, payload),
        LessonNode::MatchConcepts { id, payload } => tagged(node, id, payload),
        LessonNode::File { id, payload } => tagged(node, id, payload),
        LessonNode::Image { id, payload } => tagged(node, id, payload),
        LessonNode::PageBreak { id } => tagged(node, id, &json!({})),
        // Host blocks serialize as-is; their tag is the fragment's own kind
        LessonNode::RichText { state, .. } => Ok(serde_json::to_value(state)?),
    }
}

fn tagged<P: serde::Serialize>(
    node: &LessonNode,
    id: &NodeId,
    payload: &P,
) -> Result<Value, NodeError> {
    let mut obj = match serde_json::to_value(payload)? {
        Value::Object(obj) => obj,
        _ => Map::new(),
    };
    obj.insert("type".into(), json!(node.node_type().as_str()));
    obj.insert("uuid".into(), json!(id.uuid));
    obj.insert("version".into(), json!(id.version));
    Ok(Value::Object(obj))
}

/// Serialize a whole document to the persisted `{ root: ... }` form
pub fn export_document(doc: &LessonDocument) -> Result<Value, NodeError> {
    let children = doc
        .children()
        .iter()
        .map(export_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(json!({
        "root": {
            "children": children,
            "direction": doc.root.direction,
            "format": doc.root.format,
            "indent": doc.root.indent,
            "type": "root",
            "version": doc.root.version,
        }
    }))
}

// ---------------------------------------------------------------------------
// Import

/// Identity fields shared by every custom node's persisted form
fn import_id(value: &Value) -> NodeId {
    let uuid = value
        .get("uuid")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        // Legacy shape without identity: a fresh uuid is the safe default
        .unwrap_or_else(Uuid::new_v4);
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(1);

    let mut id = NodeId::with_uuid(uuid);
    id.version = version;
    id
}

pub(crate) fn import_true_or_false(
    value: &Value,
    _integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    let payload: TrueOrFalsePayload = serde_json::from_value(value.clone())?;
    Ok(LessonNode::TrueOrFalse {
        id: import_id(value),
        payload,
    })
}

pub(crate) fn import_tap_to_reveal(
    value: &Value,
    _integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    let payload: TapToRevealPayload = serde_json::from_value(value.clone())?;
    Ok(LessonNode::TapToReveal {
        id: import_id(value),
        payload,
    })
}

pub(crate) fn import_match_concepts(
    value: &Value,
    integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    let title = value
        .get("title")
        .and_then(RichTextState::from_value)
        .unwrap_or_default();

    // Leniency policy: malformed items are filtered, never fatal, so
    // forward-compatible documents keep loading. Drops are counted.
    let raw_items = match value.get("items") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            warn!(found = %kind_of(other), "match-concepts items is not a list; treating as empty");
            &[]
        }
        None => &[],
    };

    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let item = raw.get("item").and_then(RichTextState::from_value);
        let item_value = raw.get("value").and_then(RichTextState::from_value);
        match (item, item_value) {
            (Some(item), Some(value)) => items.push(MatchPair { item, value }),
            _ => {
                warn!("dropping malformed match-concepts item");
                integrity.dropped_match_items += 1;
            }
        }
    }

    Ok(LessonNode::MatchConcepts {
        id: import_id(value),
        payload: MatchConceptsPayload { title, items },
    })
}

/// Wire shape for file metadata; tolerates legacy documents that predate
/// explicit `fileType`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadataWire {
    #[serde(default)]
    file_type: Option<FileKind>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    max_width: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilePayloadWire {
    src: String,
    #[serde(default)]
    alt_text: String,
    #[serde(default)]
    metadata: Option<FileMetadataWire>,
}

pub(crate) fn import_file(
    value: &Value,
    _integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    let wire: FilePayloadWire = serde_json::from_value(value.clone())?;

    let meta = wire.metadata.unwrap_or(FileMetadataWire {
        file_type: None,
        file_name: None,
        size: None,
        width: None,
        height: None,
        max_width: None,
    });

    let file_type = meta.file_type.unwrap_or_else(|| FileKind::infer(&wire.src));
    let file_name = meta.file_name.unwrap_or_else(|| file_name_of(&wire.src));

    Ok(LessonNode::File {
        id: import_id(value),
        payload: FilePayload {
            src: wire.src,
            alt_text: wire.alt_text,
            metadata: FileMetadata {
                file_type,
                file_name,
                size: meta.size,
                width: meta.width,
                height: meta.height,
                max_width: meta.max_width,
            },
        },
    })
}

pub(crate) fn import_image(
    value: &Value,
    _integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    let payload: ImagePayload = serde_json::from_value(value.clone())?;
    Ok(LessonNode::Image {
        id: import_id(value),
        payload,
    })
}

pub(crate) fn import_page_break(
    value: &Value,
    _integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    Ok(LessonNode::PageBreak {
        id: import_id(value),
    })
}

/// Import one node through registry dispatch
pub fn import_node(
    registry: &NodeRegistry,
    value: &Value,
    integrity: &mut DocumentIntegrity,
) -> Result<LessonNode, NodeError> {
    registry.import_json(value, integrity)
}

/// Import a whole persisted document.
///
/// Custom nodes go through the registry; anything else with a valid
/// fragment shape passes through opaquely so host prose survives; the
/// rest is dropped and counted.
pub fn import_document(
    registry: &NodeRegistry,
    value: &Value,
) -> Result<(LessonDocument, DocumentIntegrity), NodeError> {
    let root = value
        .get("root")
        .and_then(Value::as_object)
        .ok_or_else(|| NodeError::InvalidShape("document has no root object".into()))?;

    let mut integrity = DocumentIntegrity::default();
    let mut children = Vec::new();

    let raw_children = match root.get("children") {
        Some(Value::Array(raw)) => raw.as_slice(),
        _ => &[],
    };

    for raw in raw_children {
        if raw.get("type").and_then(Value::as_str).is_none() {
            warn!("skipping untyped document child");
            integrity.untyped_nodes += 1;
            continue;
        }

        match registry.import_json(raw, &mut integrity) {
            Ok(node) => children.push(node),
            Err(err) if err.is_unsupported() => {
                // Not one of ours; keep host content opaquely when it at
                // least looks like a fragment
                match RichTextState::from_value(raw) {
                    Some(state) => children.push(LessonNode::rich_text(state)),
                    None => {
                        warn!("skipping unparseable host block");
                        integrity.malformed_nodes += 1;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed node");
                integrity.malformed_nodes += 1;
            }
        }
    }

    let document = LessonDocument {
        root: RootState {
            children,
            direction: root
                .get("direction")
                .and_then(Value::as_str)
                .map(str::to_string),
            format: root.get("format").cloned().unwrap_or(Value::Null),
            indent: root.get("indent").and_then(Value::as_i64).unwrap_or(0),
            version: root
                .get("version")
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .unwrap_or(1),
        },
    };

    Ok((document, integrity))
}

fn file_name_of(src: &str) -> String {
    src.split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(src)
        .rsplit('/')
        .next()
        .unwrap_or(src)
        .to_string()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
