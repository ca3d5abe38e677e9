#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only structural impossibilities are errors: a dangling `$ref` or two sources
//! colliding on one exported name. Naming-quality degradations are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic) values instead.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The input document (or a config file) could not be parsed.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A `$ref` points to a schema that does not exist in `components/schemas`.
    #[from(ignore)]
    #[display("Unresolved reference '{reference}' at {path}")]
    SchemaResolution {
        /// The raw `$ref` string.
        reference: String,
        /// JSON Pointer of the node carrying the reference.
        path: String,
    },

    /// Two distinct sources map to the same exported name within one namespace.
    #[from(ignore)]
    #[display(
        "Name collision in {namespace}: '{first}' and '{second}' both resolve to '{canonical}'"
    )]
    NameCollision {
        /// Namespace the collision happened in (`types`, `validators`, `methods`).
        namespace: String,
        /// The colliding exported name.
        canonical: String,
        /// Source identifier that claimed the name first.
        first: String,
        /// Source identifier that tried to claim it second.
        second: String,
    },

    /// Invalid generator configuration.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
