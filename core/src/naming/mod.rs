#![deny(missing_docs)]

//! # Naming
//!
//! Case conversion, canonical-name resolution and the optional oracle of
//! already-declared names.

pub mod case;
pub mod oracle;
pub mod resolver;

pub use oracle::{OracleState, TypeNameOracle};
pub use resolver::{NameBinding, NameKind, NameResolver, ResolutionStrategy, Role};
