#![deny(missing_docs)]

//! # Document Access
//!
//! Parsing of the raw input text and the lookups that locate an operation's
//! request-body schema and success-response schema.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::{extract_component_name, join_pointer};
use crate::oas::shims::{ShimComponents, ShimDocument, ShimOperation, HTTP_METHODS};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Parses a JSON or YAML document into the shim model.
///
/// YAML is a superset of JSON, so a single parser handles both. Key order is
/// preserved (`serde_json/preserve_order`).
pub fn parse_document(content: &str) -> AppResult<ShimDocument> {
    let raw: Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::Parse(format!("Failed to parse API description: {}", e)))?;
    parse_document_value(raw)
}

/// Converts an already-parsed JSON value into the shim model.
pub fn parse_document_value(raw: Value) -> AppResult<ShimDocument> {
    if !raw.is_object() {
        return Err(AppError::Parse(
            "API description must be a JSON/YAML object".into(),
        ));
    }
    serde_json::from_value(raw)
        .map_err(|e| AppError::Parse(format!("Unexpected document structure: {}", e)))
}

/// Picks the operation of a path item: `post` if present, else the first HTTP method
/// in document order.
pub fn select_operation<'a>(
    path: &str,
    item: &'a IndexMap<String, Value>,
) -> AppResult<Option<(&'a str, ShimOperation)>> {
    let chosen = item
        .get_key_value("post")
        .or_else(|| {
            item.iter()
                .find(|(k, _)| HTTP_METHODS.contains(&k.to_ascii_lowercase().as_str()))
        });

    match chosen {
        Some((method, raw)) => {
            let op = serde_json::from_value::<ShimOperation>(raw.clone()).map_err(|e| {
                AppError::Parse(format!(
                    "Failed to parse operation '{} {}': {}",
                    method, path, e
                ))
            })?;
            Ok(Some((method.as_str(), op)))
        }
        None => Ok(None),
    }
}

/// Derives the wire method name: the `operationId`, else the path itself.
///
/// e.g. `/block` -> `block`, `/light/{id}/proof` -> `light_id_proof`
pub fn derive_method_name(path: &str, op: &ShimOperation) -> String {
    if let Some(id) = op.operation_id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    let clean = path.replace(['{', '}'], "").replace('/', "_");
    let trimmed = clean.trim_matches('_');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Locates the raw request-body schema and its JSON Pointer.
pub fn request_body_schema<'a>(
    op: &'a ShimOperation,
    components: &'a ShimComponents,
    op_pointer: &str,
) -> Option<(&'a Value, String)> {
    let body = op.request_body.as_ref()?;
    let (body, body_pointer) = follow_component(
        body,
        "requestBodies",
        &components.request_bodies,
        join_pointer(op_pointer, "requestBody"),
    )?;
    media_schema(body, &body_pointer)
}

/// Locates the raw success-response schema and its JSON Pointer.
///
/// Preference order: `200`, `2XX`, `2xx`, then the first concrete `2xx` code.
pub fn success_response_schema<'a>(
    op: &'a ShimOperation,
    components: &'a ShimComponents,
    op_pointer: &str,
) -> Option<(&'a Value, String)> {
    let mut chosen = None;
    for key in ["200", "2XX", "2xx"] {
        if let Some(r) = op.responses.get_key_value(key) {
            chosen = Some(r);
            break;
        }
    }
    if chosen.is_none() {
        chosen = op.responses.iter().find(|(key, _)| {
            key.starts_with('2') && key.len() == 3 && key.chars().all(|c| c.is_ascii_digit())
        });
    }

    let (status, response) = chosen?;
    let responses_pointer = join_pointer(op_pointer, "responses");
    let (response, response_pointer) = follow_component(
        response,
        "responses",
        &components.responses,
        join_pointer(&responses_pointer, status),
    )?;
    media_schema(response, &response_pointer)
}

/// Follows a one-hop `$ref` into a components section.
fn follow_component<'a>(
    value: &'a Value,
    section: &str,
    entries: &'a IndexMap<String, Value>,
    pointer: String,
) -> Option<(&'a Value, String)> {
    match value.get("$ref").and_then(Value::as_str) {
        Some(reference) => {
            let name = extract_component_name(reference, section)?;
            let target = entries.get(&name)?;
            let target_pointer = join_pointer(&join_pointer("#/components", section), &name);
            Some((target, target_pointer))
        }
        None => Some((value, pointer)),
    }
}

fn media_schema<'a>(container: &'a Value, pointer: &str) -> Option<(&'a Value, String)> {
    let content = container.get("content").and_then(Value::as_object)?;
    let (media_type, media) = select_media_type(content)?;
    let schema = media.get("schema")?;
    let content_pointer = join_pointer(pointer, "content");
    let schema_pointer = join_pointer(&join_pointer(&content_pointer, media_type), "schema");
    Some((schema, schema_pointer))
}

/// Selects the most appropriate content entry for JSON-like payloads.
///
/// Preference order:
/// 1. `application/json`
/// 2. Any `+json` media type (e.g. `application/vnd.api+json`)
/// 3. `application/*`
/// 4. `*/*`
/// 5. First available entry
fn select_media_type(content: &Map<String, Value>) -> Option<(&str, &Value)> {
    if let Some(media) = content.get("application/json") {
        return Some(("application/json", media));
    }

    if let Some((k, media)) = content.iter().find(|(k, _)| k.ends_with("+json")) {
        return Some((k.as_str(), media));
    }

    for key in ["application/*", "*/*"] {
        if let Some(media) = content.get(key) {
            return Some((key, media));
        }
    }

    content.iter().next().map(|(k, media)| (k.as_str(), media))
}
