//! Change-record wire model and tag decoding.
//!
//! A batch delivers ordered change records from an at-least-once change
//! log. Row images arrive as maps of field name to a single-key tagged
//! scalar; decoding flattens them into native JSON values. Decoding is
//! deliberately lenient at the field level: one malformed field degrades
//! to its string form instead of failing the whole record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{ProjectorError, Result};

/// Operation kind carried by a change record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamOperation {
    /// New row created
    Insert,
    /// Existing row changed
    Modify,
    /// Row deleted
    Remove,
    /// Any unrecognized operation; processed as a no-op, never a failure
    #[serde(other)]
    Unknown,
}

impl StreamOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Modify => "modify",
            Self::Remove => "remove",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StreamOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-tagged scalar as carried on the wire
///
/// Closed union over the tags the change log emits. Anything else is
/// captured verbatim in `Other` and stringified during decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// String value
    S(String),
    /// Numeric value, transported as its decimal string form
    N(String),
    /// Boolean value
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Explicit null marker
    #[serde(rename = "NULL")]
    Null(bool),
    /// Unrecognized tag shape, preserved verbatim
    #[serde(untagged)]
    Other(Value),
}

impl AttrValue {
    /// Decode one tagged scalar into its native JSON value.
    ///
    /// A numeric literal that fails to parse is kept as the raw string,
    /// and an unrecognized tag decodes to its compact JSON text.
    pub fn decode(&self) -> Value {
        match self {
            Self::S(s) => Value::String(s.clone()),
            Self::N(raw) => match raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(raw.clone()),
            },
            Self::Bool(b) => Value::Bool(*b),
            Self::Null(_) => Value::Null,
            Self::Other(v) => Value::String(v.to_string()),
        }
    }
}

/// Row image as delivered on the wire: field name to tagged scalar
pub type TypedRow = HashMap<String, AttrValue>;

/// Flattened, native-typed row produced by [`decode_row`]
pub type DecodedRow = Map<String, Value>;

/// Decode a full row image into a flat native-typed map
pub fn decode_row(row: &TypedRow) -> DecodedRow {
    row.iter().map(|(k, v)| (k.clone(), v.decode())).collect()
}

/// One entry from the change log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// The operation this record represents
    pub operation: StreamOperation,

    /// Row image before the change; present for Remove
    #[serde(default, rename = "beforeImage", skip_serializing_if = "Option::is_none")]
    pub before_image: Option<TypedRow>,

    /// Row image after the change; present for Insert and Modify
    #[serde(default, rename = "afterImage", skip_serializing_if = "Option::is_none")]
    pub after_image: Option<TypedRow>,
}

impl ChangeRecord {
    /// After image, required for Insert and Modify records
    pub fn require_after_image(&self) -> Result<&TypedRow> {
        self.after_image.as_ref().ok_or_else(|| {
            ProjectorError::decode(format!("{} record carries no after image", self.operation))
        })
    }

    /// Before image, required for Remove records
    pub fn require_before_image(&self) -> Result<&TypedRow> {
        self.before_image.as_ref().ok_or_else(|| {
            ProjectorError::decode(format!("{} record carries no before image", self.operation))
        })
    }
}

/// Ordered batch of change records as delivered by the trigger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordBatch {
    #[serde(default)]
    pub records: Vec<ChangeRecord>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_tag_to_its_native_value() {
        let row: TypedRow = serde_json::from_value(json!({
            "nombre": {"S": "Teclado"},
            "precio": {"N": "129.5"},
            "activo": {"BOOL": true},
            "descuento": {"NULL": true},
        }))
        .unwrap();

        let decoded = decode_row(&row);
        assert_eq!(decoded["nombre"], json!("Teclado"));
        assert_eq!(decoded["precio"], json!(129.5));
        assert_eq!(decoded["activo"], json!(true));
        assert_eq!(decoded["descuento"], Value::Null);
    }

    #[test]
    fn unparsable_number_degrades_to_the_raw_literal() {
        let value: AttrValue = serde_json::from_value(json!({"N": "12,5"})).unwrap();
        assert_eq!(value.decode(), json!("12,5"));
    }

    #[test]
    fn unrecognized_tag_degrades_to_its_textual_form() {
        let value: AttrValue = serde_json::from_value(json!({"SS": ["a", "b"]})).unwrap();
        assert!(matches!(value, AttrValue::Other(_)));
        assert_eq!(value.decode(), json!(r#"{"SS":["a","b"]}"#));
    }

    #[test]
    fn wire_operations_deserialize_including_the_catch_all() {
        let op: StreamOperation = serde_json::from_value(json!("INSERT")).unwrap();
        assert_eq!(op, StreamOperation::Insert);
        let op: StreamOperation = serde_json::from_value(json!("REMOVE")).unwrap();
        assert_eq!(op, StreamOperation::Remove);
        let op: StreamOperation = serde_json::from_value(json!("TRUNCATE")).unwrap();
        assert_eq!(op, StreamOperation::Unknown);
    }

    #[test]
    fn missing_images_are_decode_errors() {
        let record: ChangeRecord =
            serde_json::from_value(json!({"operation": "MODIFY"})).unwrap();
        assert!(record.require_after_image().is_err());

        let record: ChangeRecord =
            serde_json::from_value(json!({"operation": "REMOVE"})).unwrap();
        assert!(record.require_before_image().is_err());
    }

    #[test]
    fn batch_deserializes_with_images_in_place() {
        let batch: RecordBatch = serde_json::from_value(json!({
            "records": [{
                "operation": "REMOVE",
                "beforeImage": {"codigo": {"S": "p-1"}}
            }]
        }))
        .unwrap();

        assert_eq!(batch.len(), 1);
        let image = batch.records[0].require_before_image().unwrap();
        assert_eq!(image["codigo"], AttrValue::S("p-1".into()));
    }
}
