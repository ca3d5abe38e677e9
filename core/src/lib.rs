#![deny(missing_docs)]

//! # rpcgen Core
//!
//! Generates TypeScript types, Zod validators, a validation lookup table and a
//! method interface from a JSON-RPC API description.
//!
//! ```text
//! document ──> SchemaStore ──> TypeEmitter / ValidatorEmitter ──> MethodBinder
//!                                                                   │
//!              methods.ts <── validation.ts <── ValidationMap <─────┘
//! ```

/// Shared error types.
pub mod error;

/// Non-fatal findings of a run.
pub mod diagnostics;

/// Normalized schema model.
pub mod schema;

/// Input document parsing and normalization.
pub mod oas;

/// Loaded schemas and operations.
pub mod store;

/// Case conversion, name resolution and the type-name oracle.
pub mod naming;

/// TypeScript and Zod emission.
pub mod emit;

/// Envelope unwrapping and method binding.
pub mod binder;

/// Per-operation type and validator declarations.
pub mod operations;

/// Method-to-validator lookup table.
pub mod validation_map;

/// Client-facing method interface.
pub mod interface;

/// Generator settings.
pub mod config;

/// Stage orchestration and artifact output.
pub mod pipeline;

pub use binder::{BoundMethod, MethodBinder, MethodBinding, SchemaRef};
pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use emit::{
    DeclarationUnit, Emitter, Namespace, Renderer, TypeEmitter, TypeScriptRenderer,
    ValidatorEmitter, ZodRenderer,
};
pub use error::{AppError, AppResult};
pub use interface::MethodInterfaceEmitter;
pub use naming::{
    NameBinding, NameKind, NameResolver, OracleState, ResolutionStrategy, Role, TypeNameOracle,
};
pub use pipeline::{Artifact, GenerationOutput, Generator, GENERATED_HEADER};
pub use schema::{ObjectShape, Primitive, SchemaKind, SchemaNode, UnionShape};
pub use store::{OperationDescriptor, SchemaStore};
pub use validation_map::{ValidationEntry, ValidationMap};
