#![deny(missing_docs)]

//! # Schema Store
//!
//! Holds the named-schema map and the operation list exactly as loaded, in
//! document order. Loading normalizes every schema and verifies that every
//! reference site points at an existing schema.

use crate::error::{AppError, AppResult};
use crate::oas::document::{
    derive_method_name, parse_document, request_body_schema, select_operation,
    success_response_schema,
};
use crate::oas::normalization::{Normalizer, ReferenceSite};
use crate::oas::ref_utils::{join_pointer, schema_pointer};
use crate::oas::shims::ShimDocument;
use crate::schema::SchemaNode;
use indexmap::IndexMap;
use std::path::Path;

/// One operation of the API description.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    /// Path template; unique key of the operation.
    pub path: String,
    /// HTTP method the operation was declared under.
    pub http_method: String,
    /// Wire-protocol method name.
    pub method_name: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// The request-body schema (usually a reference to an envelope).
    pub request_schema: Option<SchemaNode>,
    /// The success-response schema (usually a reference to an envelope).
    pub response_schema: Option<SchemaNode>,
}

/// The loaded document.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    schemas: IndexMap<String, SchemaNode>,
    operations: Vec<OperationDescriptor>,
}

impl SchemaStore {
    /// Loads a store from JSON or YAML text.
    pub fn from_document_str(content: &str) -> AppResult<Self> {
        Self::from_document(parse_document(content)?)
    }

    /// Loads a store from a file on disk.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::General(format!(
                "Failed to read API description {:?}: {}",
                path, e
            ))
        })?;
        Self::from_document_str(&content)
    }

    /// Builds a store from the shim model.
    pub fn from_document(doc: ShimDocument) -> AppResult<Self> {
        let mut normalizer = Normalizer::new();

        let mut schemas = IndexMap::with_capacity(doc.components.schemas.len());
        for (name, raw) in &doc.components.schemas {
            let node = normalizer.normalize(raw, &schema_pointer(name))?;
            schemas.insert(name.clone(), node);
        }

        let mut operations = Vec::with_capacity(doc.paths.len());
        let mut method_owners: IndexMap<String, String> = IndexMap::new();
        for (path, item) in &doc.paths {
            let Some((http_method, op)) = select_operation(path, item)? else {
                tracing::debug!(path = %path, "path item declares no operation, skipping");
                continue;
            };
            let op_pointer = join_pointer(&join_pointer("#/paths", path), http_method);

            let request_schema = match request_body_schema(&op, &doc.components, &op_pointer) {
                Some((raw, pointer)) => Some(normalizer.normalize(raw, &pointer)?),
                None => None,
            };
            let response_schema = match success_response_schema(&op, &doc.components, &op_pointer)
            {
                Some((raw, pointer)) => Some(normalizer.normalize(raw, &pointer)?),
                None => None,
            };

            let method_name = derive_method_name(path, &op);
            if let Some(first) = method_owners.insert(method_name.clone(), path.clone()) {
                return Err(AppError::NameCollision {
                    namespace: "methods".into(),
                    canonical: method_name,
                    first,
                    second: path.clone(),
                });
            }

            operations.push(OperationDescriptor {
                path: path.clone(),
                http_method: http_method.to_string(),
                method_name,
                summary: op.summary,
                description: op.description,
                deprecated: op.deprecated,
                request_schema,
                response_schema,
            });
        }

        verify_reference_sites(normalizer.sites(), &schemas)?;

        tracing::debug!(
            schemas = schemas.len(),
            operations = operations.len(),
            "loaded API description"
        );

        Ok(Self {
            schemas,
            operations,
        })
    }

    /// Builds a store directly from already-normalized parts.
    ///
    /// References are verified the same way as when loading a document.
    pub fn from_parts(
        schemas: IndexMap<String, SchemaNode>,
        operations: Vec<OperationDescriptor>,
    ) -> AppResult<Self> {
        for (name, node) in &schemas {
            check_targets(node, &schema_pointer(name), &schemas)?;
        }
        for op in &operations {
            let op_pointer = join_pointer("#/paths", &op.path);
            for node in op.request_schema.iter().chain(op.response_schema.iter()) {
                check_targets(node, &op_pointer, &schemas)?;
            }
        }
        Ok(Self {
            schemas,
            operations,
        })
    }

    /// All schemas, in document order.
    pub fn schemas(&self) -> &IndexMap<String, SchemaNode> {
        &self.schemas
    }

    /// Looks up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// All operations, in document order.
    pub fn operations(&self) -> &[OperationDescriptor] {
        &self.operations
    }

    /// Follows a chain of references to the first non-reference node.
    ///
    /// Gives up (returning `None`) on a reference loop.
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> Option<&'a SchemaNode> {
        let mut current = node;
        for _ in 0..=self.schemas.len() {
            match current.reference_target() {
                Some(name) => current = self.schemas.get(name)?,
                None => return Some(current),
            }
        }
        None
    }
}

fn verify_reference_sites(
    sites: &[ReferenceSite],
    schemas: &IndexMap<String, SchemaNode>,
) -> AppResult<()> {
    match sites.iter().find(|site| !schemas.contains_key(&site.target)) {
        Some(site) => Err(AppError::SchemaResolution {
            reference: site.reference.clone(),
            path: site.path.clone(),
        }),
        None => Ok(()),
    }
}

fn check_targets(
    node: &SchemaNode,
    pointer: &str,
    schemas: &IndexMap<String, SchemaNode>,
) -> AppResult<()> {
    match node
        .referenced_names()
        .into_iter()
        .find(|name| !schemas.contains_key(name))
    {
        Some(missing) => Err(AppError::SchemaResolution {
            reference: schema_pointer(&missing),
            path: pointer.to_string(),
        }),
        None => Ok(()),
    }
}
