#![deny(missing_docs)]

//! # Method Binding
//!
//! Binds each operation to the concrete schemas behind its request and response
//! envelopes, and names them through the [`NameResolver`].
//!
//! * **Request**: body → envelope → `params` → first reference.
//! * **Response**: success body → envelope → the single union branch exposing
//!   `result` → first reference inside `result` (a nullable result is a union
//!   and is unwrapped the same way).
//!
//! A side that cannot be unwrapped is bound to the heuristic
//! `PascalCase(method) + Request|Response` name and reported as a
//! [`Diagnostic::EnvelopeUnwrapFailure`]; binding never fails.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::naming::{NameBinding, NameKind, NameResolver, Role, TypeNameOracle};
use crate::schema::{SchemaKind, SchemaNode};
use crate::store::{OperationDescriptor, SchemaStore};
use serde::Serialize;

/// The schema one side of an operation was bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// A schema of `components/schemas`, by name.
    Resolved(String),
    /// No schema could be found.
    Unresolved,
}

impl SchemaRef {
    /// The schema name, if resolved.
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaRef::Resolved(name) => Some(name),
            SchemaRef::Unresolved => None,
        }
    }

    /// Returns true if a schema was found.
    pub fn is_resolved(&self) -> bool {
        matches!(self, SchemaRef::Resolved(_))
    }
}

/// One side (request or response) of a bound operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBinding {
    /// Which side.
    pub role: Role,
    /// The bound schema.
    pub schema: SchemaRef,
    /// Name of the type for this side.
    pub type_name: NameBinding,
    /// Name of the validator for this side; absent when unresolved.
    pub validator_name: Option<NameBinding>,
}

/// An operation with both sides bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundMethod {
    /// Path of the operation.
    pub path: String,
    /// Wire method name.
    pub method_name: String,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// The request side.
    pub request: MethodBinding,
    /// The response side.
    pub response: MethodBinding,
}

impl BoundMethod {
    /// The binding of the given side.
    pub fn side(&self, role: Role) -> &MethodBinding {
        match role {
            Role::Request => &self.request,
            Role::Response => &self.response,
        }
    }
}

/// Binds operations of a store.
#[derive(Debug, Clone)]
pub struct MethodBinder<'a> {
    store: &'a SchemaStore,
    resolver: &'a NameResolver,
    known_types: Option<&'a TypeNameOracle>,
    known_validators: Option<&'a TypeNameOracle>,
}

impl<'a> MethodBinder<'a> {
    /// Creates a binder resolving names by heuristics only.
    pub fn new(store: &'a SchemaStore, resolver: &'a NameResolver) -> Self {
        Self {
            store,
            resolver,
            known_types: None,
            known_validators: None,
        }
    }

    /// Uses `known` to resolve type names.
    pub fn with_known_types(mut self, known: Option<&'a TypeNameOracle>) -> Self {
        self.known_types = known;
        self
    }

    /// Uses `known` to resolve validator names.
    pub fn with_known_validators(mut self, known: Option<&'a TypeNameOracle>) -> Self {
        self.known_validators = known;
        self
    }

    /// Binds every operation of the store, in document order.
    pub fn bind_all(&self, diagnostics: &mut Diagnostics) -> Vec<BoundMethod> {
        self.store
            .operations()
            .iter()
            .map(|op| self.bind(op, diagnostics))
            .collect()
    }

    /// Binds one operation.
    pub fn bind(&self, op: &OperationDescriptor, diagnostics: &mut Diagnostics) -> BoundMethod {
        let request = self.bind_side(op, Role::Request, self.unwrap_request(op), diagnostics);
        let response = self.bind_side(op, Role::Response, self.unwrap_response(op), diagnostics);
        BoundMethod {
            path: op.path.clone(),
            method_name: op.method_name.clone(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            deprecated: op.deprecated,
            request,
            response,
        }
    }

    /// Finds the parameter schema of an operation.
    ///
    /// Returns the reason on failure.
    pub fn unwrap_request(&self, op: &OperationDescriptor) -> Result<String, String> {
        let body = op
            .request_schema
            .as_ref()
            .ok_or("operation has no request body")?;
        let envelope = self
            .store
            .resolve(body)
            .ok_or("request body reference does not terminate")?;
        let params = envelope
            .property("params")
            .ok_or("envelope has no 'params' property")?;
        params
            .first_reference()
            .map(str::to_string)
            .ok_or_else(|| "'params' carries no schema reference".to_string())
    }

    /// Finds the success-result schema of an operation.
    ///
    /// Returns the reason on failure.
    pub fn unwrap_response(&self, op: &OperationDescriptor) -> Result<String, String> {
        let body = op
            .response_schema
            .as_ref()
            .ok_or("operation has no success response")?;
        let envelope = self
            .store
            .resolve(body)
            .ok_or("response body reference does not terminate")?;

        let branches = self.envelope_branches(envelope);
        let mut results = branches
            .into_iter()
            .filter_map(|branch| self.store.resolve(branch))
            .filter_map(|branch| branch.property("result"));

        let result = match (results.next(), results.next()) {
            (Some(result), None) => result,
            (None, _) => return Err("no envelope branch exposes a 'result' property".into()),
            (Some(_), Some(_)) => {
                return Err("more than one envelope branch exposes a 'result' property".into())
            }
        };

        result
            .first_reference()
            .map(str::to_string)
            .ok_or_else(|| "'result' carries no schema reference".to_string())
    }

    /// The alternatives of a response envelope.
    ///
    /// A union contributes its branches; an intersection contributes the
    /// branches of its first union part. Anything else is a single branch.
    fn envelope_branches<'n>(&'n self, envelope: &'n SchemaNode) -> Vec<&'n SchemaNode> {
        match &envelope.kind {
            SchemaKind::Union(union) => union.branches.iter().collect(),
            SchemaKind::Intersection(parts) => parts
                .iter()
                .filter_map(|part| self.store.resolve(part))
                .find_map(|part| match &part.kind {
                    SchemaKind::Union(union) => Some(union.branches.iter().collect()),
                    _ => None,
                })
                .unwrap_or_else(|| vec![envelope]),
            _ => vec![envelope],
        }
    }

    fn bind_side(
        &self,
        op: &OperationDescriptor,
        role: Role,
        outcome: Result<String, String>,
        diagnostics: &mut Diagnostics,
    ) -> MethodBinding {
        match outcome {
            Ok(schema) => MethodBinding {
                role,
                type_name: self
                    .resolver
                    .resolve(&schema, NameKind::Type, self.known_types),
                validator_name: Some(self.resolver.resolve(
                    &schema,
                    NameKind::Validator,
                    self.known_validators,
                )),
                schema: SchemaRef::Resolved(schema),
            },
            Err(reason) => {
                tracing::warn!(
                    path = %op.path,
                    method = %op.method_name,
                    %role,
                    %reason,
                    "falling back to heuristic name"
                );
                diagnostics.push(Diagnostic::EnvelopeUnwrapFailure {
                    path: op.path.clone(),
                    method_name: op.method_name.clone(),
                    role,
                    reason,
                });
                MethodBinding {
                    role,
                    schema: SchemaRef::Unresolved,
                    type_name: self
                        .resolver
                        .operation_fallback(&op.method_name, role, NameKind::Type),
                    validator_name: None,
                }
            }
        }
    }
}
