//! Canvas document data model
//!
//! Mirrors the canvas JSON shape: top-level `nodes`, `edges`, `metadata`.
//! Canvas files are also edited by the host's own renderer and by users
//! directly, so unknown sibling keys and non-file node kinds must survive a
//! read/append/write cycle untouched. Every struct carries a flattened
//! `extra` map, and nodes this system does not understand stay raw values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Node `type` value for cards that reference a document
pub const FILE_NODE_TYPE: &str = "file";

/// `metadata.version` written into documents this system creates
pub const METADATA_VERSION: &str = "1.0";

/// Generate a fresh card ID (UUID v4, collision-free within a batch)
pub fn new_card_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A file-type card: one document rendered as a positioned rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Vault path of the referenced document (dangling references tolerated)
    pub file: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Keys other producers put on the node (color, subpath, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileCard {
    /// Create a card for `file` at the given position, with a fresh ID
    pub fn new(file: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: new_card_id(),
            kind: FILE_NODE_TYPE.to_string(),
            file: file.into(),
            x,
            y,
            width,
            height,
            extra: Map::new(),
        }
    }
}

/// One entry of the `nodes` array
///
/// Only file-type nodes are this system's concern; everything else (text,
/// link, group nodes, or shapes from other producers) is carried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    File(FileCard),
    Other(Value),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::File(card) => card.serialize(serializer),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.get("type").and_then(Value::as_str) == Some(FILE_NODE_TYPE) {
            // A "file" node missing required fields is kept raw rather than
            // rejected, so a half-written node from another producer survives
            if let Ok(card) = serde_json::from_value::<FileCard>(value.clone()) {
                return Ok(Self::File(card));
            }
        }
        Ok(Self::Other(value))
    }
}

/// The persisted canvas aggregate
///
/// `edges` is never created or reordered by this system but always written
/// back exactly as read. Missing arrays default to empty on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Unknown top-level keys from other producers
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasDocument {
    /// A structurally-complete empty document (valid on disk as written)
    pub fn empty() -> Self {
        Self {
            metadata: Some(Self::default_metadata()),
            ..Self::default()
        }
    }

    /// The metadata object written into new documents
    pub fn default_metadata() -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("version".to_string(), Value::String(METADATA_VERSION.to_string()));
        metadata.insert("frontmatter".to_string(), Value::Object(Map::new()));
        metadata
    }

    /// Insert default metadata only when none is present
    pub fn ensure_metadata(&mut self) {
        if self.metadata.is_none() {
            self.metadata = Some(Self::default_metadata());
        }
    }

    /// Append a card at the end of the node list (never reorders)
    pub fn push_card(&mut self, card: FileCard) {
        self.nodes.push(Node::File(card));
    }

    /// Iterate the file-type cards
    pub fn file_cards(&self) -> impl Iterator<Item = &FileCard> {
        self.nodes.iter().filter_map(|node| match node {
            Node::File(card) => Some(card),
            Node::Other(_) => None,
        })
    }
}
