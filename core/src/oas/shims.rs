#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! They capture only the parts of an API description the generator reads and keep
//! schemas as raw JSON so normalization stays total over malformed input.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// HTTP methods recognised as operations inside a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "post", "get", "put", "patch", "delete", "head", "options", "trace",
];

/// Root of the input document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimDocument {
    /// Path items keyed by path template, in document order.
    #[serde(default)]
    pub paths: IndexMap<String, IndexMap<String, Value>>,
    /// Reusable components.
    #[serde(default)]
    pub components: ShimComponents,
}

/// The `components` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimComponents {
    /// Named schemas, kept raw.
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
    /// Named request bodies (targets of `#/components/requestBodies/*`).
    #[serde(default, rename = "requestBodies")]
    pub request_bodies: IndexMap<String, Value>,
    /// Named responses (targets of `#/components/responses/*`).
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
}

/// A single operation inside a path item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimOperation {
    /// Wire-protocol method name, when declared.
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
    /// Request body (inline or `$ref`).
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<Value>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_defaults() {
        let doc: ShimDocument = serde_json::from_value(json!({ "openapi": "3.0.0" })).unwrap();
        assert!(doc.paths.is_empty());
        assert!(doc.components.schemas.is_empty());
    }

    #[test]
    fn test_operation_fields() {
        let op: ShimOperation = serde_json::from_value(json!({
            "operationId": "block",
            "summary": "Returns block details",
            "requestBody": { "$ref": "#/components/requestBodies/Block" },
            "responses": { "200": { "description": "ok" } }
        }))
        .unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("block"));
        assert!(op.request_body.is_some());
        assert!(op.responses.contains_key("200"));
        assert!(!op.deprecated);
    }
}
