#![deny(missing_docs)]

//! # API Description Parsing
//!
//! - **shims**: Intermediate deserialization layer for the input document.
//! - **document**: Parsing, operation selection and body lookup.
//! - **normalization**: Raw schema JSON to [`SchemaNode`](crate::schema::SchemaNode).
//! - **ref_utils**: JSON Pointer helpers for `$ref` strings.

pub mod document;
pub mod normalization;
pub mod ref_utils;
pub mod shims;

pub use document::parse_document;
pub use normalization::{Normalizer, ReferenceSite};
pub use shims::ShimDocument;
