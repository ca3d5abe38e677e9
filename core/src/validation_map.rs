#![deny(missing_docs)]

//! # Validation Map
//!
//! The lookup table from wire method name to the validator constructors of its
//! request and response. Keys are exactly the operation method names; a method
//! whose sides could not be bound still gets an (empty) entry.

use crate::binder::BoundMethod;
use crate::naming::case::{is_valid_identifier, quote};
use indexmap::IndexMap;
use serde::Serialize;

/// Validators of one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEntry {
    /// Wire method name.
    #[serde(skip)]
    pub method_name: String,
    /// Constructor validating the request parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_validator_name: Option<String>,
    /// Constructor validating the response result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_validator_name: Option<String>,
}

/// The full table, in operation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationMap {
    entries: IndexMap<String, ValidationEntry>,
}

impl ValidationMap {
    /// Builds the table from bound methods.
    pub fn build(methods: &[BoundMethod]) -> Self {
        let entries = methods
            .iter()
            .map(|method| {
                let entry = ValidationEntry {
                    method_name: method.method_name.clone(),
                    request_validator_name: validator(method, false),
                    response_validator_name: validator(method, true),
                };
                (method.method_name.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// Looks up the entry of a method.
    pub fn get(&self, method_name: &str) -> Option<&ValidationEntry> {
        self.entries.get(method_name)
    }

    /// Method names, in operation order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries, in operation order.
    pub fn entries(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the table as a TypeScript module.
    ///
    /// `schemas_module` is the import path of the validator unit.
    pub fn render(&self, map_name: &str, schemas_module: &str) -> String {
        let mut out = String::new();
        out.push_str("import type { z } from \"zod\";\n");
        out.push_str(&format!("import * as schemas from {};\n\n", quote(schemas_module)));
        out.push_str("export interface MethodValidation {\n");
        out.push_str("  requestSchema?: () => z.ZodTypeAny;\n");
        out.push_str("  responseSchema?: () => z.ZodTypeAny;\n");
        out.push_str("}\n\n");

        out.push_str(&format!(
            "export const {}: Record<string, MethodValidation> = {{\n",
            map_name
        ));
        for entry in self.entries.values() {
            let key = if is_valid_identifier(&entry.method_name) {
                entry.method_name.clone()
            } else {
                quote(&entry.method_name)
            };
            let fields: Vec<String> = [
                ("requestSchema", &entry.request_validator_name),
                ("responseSchema", &entry.response_validator_name),
            ]
            .into_iter()
            .filter_map(|(field, name)| {
                name.as_ref()
                    .map(|name| format!("    {}: schemas.{},\n", field, name))
            })
            .collect();

            if fields.is_empty() {
                out.push_str(&format!("  {}: {{}},\n", key));
            } else {
                out.push_str(&format!("  {}: {{\n{}  }},\n", key, fields.concat()));
            }
        }
        out.push_str("};\n");
        out
    }
}

fn validator(method: &BoundMethod, response: bool) -> Option<String> {
    let side = if response {
        &method.response
    } else {
        &method.request
    };
    if !side.schema.is_resolved() {
        return None;
    }
    side.validator_name
        .as_ref()
        .map(|binding| binding.canonical_name.clone())
}
