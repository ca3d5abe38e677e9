#![deny(missing_docs)]

//! # Type Name Oracle
//!
//! Supplies the set of names actually declared by a type-declaration unit.
//!
//! The unit is not re-parsed: top-level `export` declarations are found with a
//! regular expression, which is enough to confirm or reject a naming guess.

use crate::error::{AppError, AppResult};
use indexmap::IndexSet;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Names declared by a previously emitted artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNameOracle {
    names: IndexSet<String>,
}

impl TypeNameOracle {
    /// Creates an oracle from an explicit set of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Scans TypeScript source for top-level exported declaration names.
    pub fn scan(source: &str) -> Self {
        static EXPORT_RE: OnceLock<Regex> = OnceLock::new();
        let export_re = EXPORT_RE.get_or_init(|| {
            Regex::new(
                r"(?m)^export\s+(?:declare\s+)?(?:type|interface|const|let|enum|class|function)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
            )
            .expect("Invalid regex")
        });

        let names = export_re
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        Self { names }
    }

    /// Reads and scans an artifact on disk.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::General(format!("Failed to read type artifact {:?}: {}", path, e))
        })?;
        Ok(Self::scan(&source))
    }

    /// Returns true if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of declared names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Where the known-names set for type resolution comes from.
#[derive(Debug, Clone, Default)]
pub enum OracleState {
    /// No external source was configured.
    #[default]
    Absent,
    /// An external source produced a name set.
    Available(TypeNameOracle),
    /// An external source was configured but could not be read.
    Unavailable(String),
}
