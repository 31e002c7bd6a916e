//! Canvas document codec
//!
//! Pure serialization: no vault access here. Output uses 2-space pretty
//! printing because canvas files are commonly version-controlled and must
//! stay human-diffable.

use serde_json::Value;
use thiserror::Error;

use crate::model::CanvasDocument;

#[derive(Debug, Error)]
pub enum CanvasError {
    /// Content is not valid JSON or lacks the minimal canvas shape
    #[error("malformed canvas document: {0}")]
    Malformed(String),
}

/// Parse canvas JSON text into a document
///
/// Missing `nodes`/`edges`/`metadata` default rather than fail; a present
/// but non-array `nodes` or `edges` is malformed, as is a non-object top
/// level. Callers must not write back a file that failed to parse.
pub fn parse_canvas(text: &str) -> Result<CanvasDocument, CanvasError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CanvasError::Malformed(e.to_string()))?;

    let Value::Object(ref obj) = value else {
        return Err(CanvasError::Malformed("top level is not an object".to_string()));
    };
    for key in ["nodes", "edges"] {
        if let Some(field) = obj.get(key) {
            if !field.is_array() {
                return Err(CanvasError::Malformed(format!("`{key}` is not an array")));
            }
        }
    }

    serde_json::from_value(value).map_err(|e| CanvasError::Malformed(e.to_string()))
}

/// Serialize a document to pretty JSON (2-space indent, trailing newline)
pub fn serialize_canvas(doc: &CanvasDocument) -> Result<String, CanvasError> {
    let mut text =
        serde_json::to_string_pretty(doc).map_err(|e| CanvasError::Malformed(e.to_string()))?;
    text.push('\n');
    Ok(text)
}
