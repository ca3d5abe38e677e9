#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Converts raw (duck-typed) JSON Schema objects into [`SchemaNode`] values.
//!
//! The conversion is total: anything that does not match a known shape becomes
//! [`SchemaKind::Unknown`]. The only failure is a `$ref` that is not a local
//! `#/components/schemas/<name>` pointer. Every reference site is recorded with
//! its JSON Pointer so the store can verify targets once all schemas are known.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::{extract_component_name, join_pointer};
use crate::schema::{ObjectShape, Primitive, SchemaKind, SchemaNode, UnionShape};
use serde_json::{Map, Value};

/// A `$ref` occurrence found during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    /// Target schema name.
    pub target: String,
    /// The raw `$ref` string.
    pub reference: String,
    /// JSON Pointer of the node holding the `$ref`.
    pub path: String,
}

/// Stateful converter that accumulates reference sites.
#[derive(Debug, Default)]
pub struct Normalizer {
    sites: Vec<ReferenceSite>,
}

impl Normalizer {
    /// Creates an empty normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference sites seen so far, in traversal order.
    pub fn sites(&self) -> &[ReferenceSite] {
        &self.sites
    }

    /// Consumes the normalizer, returning the collected sites.
    pub fn into_sites(self) -> Vec<ReferenceSite> {
        self.sites
    }

    /// Normalizes the raw schema found at JSON Pointer `path`.
    pub fn normalize(&mut self, raw: &Value, path: &str) -> AppResult<SchemaNode> {
        let map = match raw {
            Value::Object(map) => map,
            // Boolean schemas (`true`/`false`) and junk carry no shape.
            _ => return Ok(SchemaNode::unknown()),
        };

        let description = map
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        let mut nullable = flag(map, "nullable") || flag(map, "x-nullable");

        let kind = if let Some(ref_val) = map.get("$ref") {
            let reference = ref_val.as_str().unwrap_or_default();
            let target = extract_component_name(reference, "schemas").ok_or_else(|| {
                AppError::SchemaResolution {
                    reference: reference.to_string(),
                    path: path.to_string(),
                }
            })?;
            self.sites.push(ReferenceSite {
                target: target.clone(),
                reference: reference.to_string(),
                path: path.to_string(),
            });
            SchemaKind::Reference(target)
        } else if let Some(values) = map.get("enum").and_then(Value::as_array) {
            enum_kind(values.clone())
        } else if let Some(value) = map.get("const") {
            enum_kind(vec![value.clone()])
        } else if let Some(branches) = union_branches(map) {
            let (keyword, items) = branches;
            let mut normalized = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = join_pointer(&join_pointer(path, keyword), &i.to_string());
                normalized.push(self.normalize(item, &item_path)?);
            }
            let shared = if map.contains_key("properties") {
                Some(self.object_shape(map, path)?)
            } else {
                None
            };
            SchemaKind::Union(UnionShape {
                branches: normalized,
                shared,
            })
        } else if let Some(items) = map.get("allOf").and_then(Value::as_array) {
            let mut parts = Vec::with_capacity(items.len() + 1);
            for (i, item) in items.iter().enumerate() {
                let item_path = join_pointer(&join_pointer(path, "allOf"), &i.to_string());
                parts.push(self.normalize(item, &item_path)?);
            }
            if map.contains_key("properties") {
                parts.push(SchemaNode::new(SchemaKind::Object(
                    self.object_shape(map, path)?,
                )));
            }
            if parts.len() == 1 {
                let mut single = parts.remove(0);
                single.nullable |= nullable;
                if description.is_some() {
                    single.description = description;
                }
                return Ok(single);
            }
            SchemaKind::Intersection(parts)
        } else {
            let (types, has_null) = declared_types(map);
            nullable |= has_null;
            self.typed_kind(map, path, &types)?
        };

        // `enum: [null]` already is the null type.
        if matches!(kind, SchemaKind::Primitive(Primitive::Null)) {
            nullable = false;
        }

        Ok(SchemaNode {
            kind,
            nullable,
            description,
        })
    }

    fn typed_kind(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        types: &[&str],
    ) -> AppResult<SchemaKind> {
        if types.len() > 1 {
            let mut branches = Vec::with_capacity(types.len());
            for ty in types {
                branches.push(SchemaNode::new(self.single_type(map, path, Some(ty))?));
            }
            return Ok(SchemaKind::Union(UnionShape {
                branches,
                shared: None,
            }));
        }
        self.single_type(map, path, types.first().copied())
    }

    fn single_type(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        ty: Option<&str>,
    ) -> AppResult<SchemaKind> {
        let kind = match ty {
            Some("string") => SchemaKind::Primitive(Primitive::String),
            Some("number") => SchemaKind::Primitive(Primitive::Number),
            Some("integer") => SchemaKind::Primitive(Primitive::Integer),
            Some("boolean") => SchemaKind::Primitive(Primitive::Boolean),
            Some("null") => SchemaKind::Primitive(Primitive::Null),
            Some("object") => SchemaKind::Object(self.object_shape(map, path)?),
            Some("array") => SchemaKind::Array(Box::new(self.array_item(map, path)?)),
            Some(_) => SchemaKind::Unknown,
            None if map.contains_key("properties") || map.contains_key("additionalProperties") => {
                SchemaKind::Object(self.object_shape(map, path)?)
            }
            None if map.contains_key("items") => {
                SchemaKind::Array(Box::new(self.array_item(map, path)?))
            }
            None => SchemaKind::Unknown,
        };
        Ok(kind)
    }

    fn array_item(&mut self, map: &Map<String, Value>, path: &str) -> AppResult<SchemaNode> {
        match map.get("items") {
            Some(items) => self.normalize(items, &join_pointer(path, "items")),
            None => Ok(SchemaNode::unknown()),
        }
    }

    fn object_shape(&mut self, map: &Map<String, Value>, path: &str) -> AppResult<ObjectShape> {
        let mut shape = ObjectShape {
            open_ended: true,
            ..Default::default()
        };

        if let Some(props) = map.get("properties").and_then(Value::as_object) {
            let props_path = join_pointer(path, "properties");
            for (name, raw) in props {
                let node = self.normalize(raw, &join_pointer(&props_path, name))?;
                shape.properties.insert(name.clone(), node);
            }
        }

        if let Some(required) = map.get("required").and_then(Value::as_array) {
            shape.required = required
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }

        match map.get("additionalProperties") {
            Some(Value::Bool(false)) => shape.open_ended = false,
            Some(raw @ Value::Object(_)) => {
                let node = self.normalize(raw, &join_pointer(path, "additionalProperties"))?;
                shape.additional = Some(Box::new(node));
            }
            _ => {}
        }

        Ok(shape)
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn union_branches(map: &Map<String, Value>) -> Option<(&'static str, &Vec<Value>)> {
    for keyword in ["oneOf", "anyOf"] {
        if let Some(items) = map.get(keyword).and_then(Value::as_array) {
            return Some((keyword, items));
        }
    }
    None
}

/// Reads `type` as a list of non-null type names plus a null flag.
fn declared_types(map: &Map<String, Value>) -> (Vec<&str>, bool) {
    match map.get("type") {
        Some(Value::String(s)) if s == "null" => (vec!["null"], false),
        Some(Value::String(s)) => (vec![s.as_str()], false),
        Some(Value::Array(items)) => {
            let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            let has_null = names.contains(&"null");
            let non_null: Vec<&str> = names.iter().copied().filter(|t| *t != "null").collect();
            if non_null.is_empty() && has_null {
                (vec!["null"], false)
            } else {
                (non_null, has_null)
            }
        }
        _ => (Vec::new(), false),
    }
}

fn enum_kind(values: Vec<Value>) -> SchemaKind {
    if values.len() == 1 && values[0].is_null() {
        SchemaKind::Primitive(Primitive::Null)
    } else {
        SchemaKind::Enum(values)
    }
}
