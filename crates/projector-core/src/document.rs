//! Flattened document projection for the `productos` index.
//!
//! The projection has a fixed field set; source fields outside it are
//! dropped, and missing fields take empty/zero defaults. The `timestamp`
//! is stamped from the processing clock at projection time and is
//! informational metadata only, never a version or ordering token.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProjectorError, Result};
use crate::record::DecodedRow;

/// Flat projection of a row image, as written to the search index.
///
/// Field names follow the downstream index mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    /// Document identifier; required non-empty
    pub codigo: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub cantidad: i64,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, rename = "fechaCreacion")]
    pub fecha_creacion: String,
    #[serde(default, rename = "fechaModificacion")]
    pub fecha_modificacion: String,
    /// Synchronization timestamp, stamped at processing time
    pub timestamp: String,
}

impl ProductDocument {
    /// Project a decoded row image into the fixed field set.
    ///
    /// Fails only when the identifier is absent or empty; every other
    /// field falls back to its default.
    pub fn from_row(row: &DecodedRow) -> Result<Self> {
        let codigo = identifier(row)?;
        Ok(Self {
            codigo,
            nombre: string_field(row, "nombre"),
            descripcion: string_field(row, "descripcion"),
            precio: f64_field(row, "precio"),
            cantidad: i64_field(row, "cantidad"),
            categoria: string_field(row, "categoria"),
            tenant_id: string_field(row, "tenant_id"),
            user_id: string_field(row, "user_id"),
            fecha_creacion: string_field(row, "fechaCreacion"),
            fecha_modificacion: string_field(row, "fechaModificacion"),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}

/// Extract the document identifier from a decoded row.
///
/// An absent or empty `codigo` means the record cannot be processed.
pub fn identifier(row: &DecodedRow) -> Result<String> {
    let codigo = string_field(row, "codigo");
    if codigo.is_empty() {
        return Err(ProjectorError::MissingIdentifier);
    }
    Ok(codigo)
}

/// Tenant the row belongs to, empty when the field is absent
pub fn tenant(row: &DecodedRow) -> String {
    string_field(row, "tenant_id")
}

fn string_field(row: &DecodedRow, name: &str) -> String {
    match row.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn f64_field(row: &DecodedRow, name: &str) -> f64 {
    match row.get(name) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn i64_field(row: &DecodedRow, name: &str) -> i64 {
    match row.get(name) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{decode_row, TypedRow};
    use serde_json::json;

    fn row(value: serde_json::Value) -> DecodedRow {
        let typed: TypedRow = serde_json::from_value(value).unwrap();
        decode_row(&typed)
    }

    #[test]
    fn projects_the_fixed_field_set() {
        let row = row(json!({
            "codigo": {"S": "p-100"},
            "nombre": {"S": "Monitor"},
            "precio": {"N": "349.99"},
            "cantidad": {"N": "12"},
            "tenant_id": {"S": "t1"},
            "fechaCreacion": {"S": "2024-03-01T10:00:00Z"},
        }));

        let doc = ProductDocument::from_row(&row).unwrap();
        assert_eq!(doc.codigo, "p-100");
        assert_eq!(doc.nombre, "Monitor");
        assert_eq!(doc.precio, 349.99);
        assert_eq!(doc.cantidad, 12);
        assert_eq!(doc.tenant_id, "t1");
        assert_eq!(doc.fecha_creacion, "2024-03-01T10:00:00Z");
        // defaults for absent fields
        assert_eq!(doc.descripcion, "");
        assert_eq!(doc.user_id, "");
        assert!(!doc.timestamp.is_empty());
    }

    #[test]
    fn missing_or_empty_identifier_is_an_error() {
        let no_codigo = row(json!({"nombre": {"S": "Monitor"}}));
        assert!(matches!(
            ProductDocument::from_row(&no_codigo),
            Err(ProjectorError::MissingIdentifier)
        ));

        let empty_codigo = row(json!({"codigo": {"S": ""}}));
        assert!(matches!(
            identifier(&empty_codigo),
            Err(ProjectorError::MissingIdentifier)
        ));
    }

    #[test]
    fn numeric_fields_coerce_from_degraded_strings() {
        // a numeric literal that failed to parse was kept as a string
        let row = row(json!({
            "codigo": {"S": "p-2"},
            "precio": {"N": "not-a-number"},
            "cantidad": {"S": "7"},
        }));

        let doc = ProductDocument::from_row(&row).unwrap();
        assert_eq!(doc.precio, 0.0);
        assert_eq!(doc.cantidad, 7);
    }

    #[test]
    fn timestamp_is_stamped_at_projection_time() {
        let row = row(json!({
            "codigo": {"S": "p-3"},
            "timestamp": {"S": "2020-01-01T00:00:00Z"},
        }));

        let doc = ProductDocument::from_row(&row).unwrap();
        assert_ne!(doc.timestamp, "2020-01-01T00:00:00Z");
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.timestamp).is_ok());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let row = row(json!({"codigo": {"S": "p-4"}}));
        let doc = ProductDocument::from_row(&row).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("fechaCreacion").is_some());
        assert!(value.get("fechaModificacion").is_some());
        assert!(value.get("fecha_creacion").is_none());
    }
}
