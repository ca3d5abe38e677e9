#![deny(missing_docs)]

//! # Diagnostics
//!
//! Non-fatal findings collected during a generation run. They never abort the
//! run; the CLI prints them and the manifest records them.

use crate::naming::Role;
use derive_more::Display;
use serde::Serialize;

/// One non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// An operation side whose schema could not be found through its envelope.
    #[display("{path} ({method_name}): {role} envelope could not be unwrapped: {reason}")]
    EnvelopeUnwrapFailure {
        /// Path of the operation.
        path: String,
        /// Method name of the operation.
        method_name: String,
        /// Which side failed.
        role: Role,
        /// What was missing.
        reason: String,
    },

    /// The configured external type-name source could not be used.
    #[display("type name source unavailable: {reason}")]
    OracleUnavailable {
        /// Why the source could not be used.
        reason: String,
    },
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Diagnostics in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of envelope unwrap failures.
    pub fn unwrap_failures(&self) -> usize {
        self.items
            .iter()
            .filter(|d| matches!(d, Diagnostic::EnvelopeUnwrapFailure { .. }))
            .count()
    }

    /// A one-line summary, e.g. `2 diagnostics (2 envelope unwrap failures)`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "no diagnostics".to_string();
        }
        format!(
            "{} diagnostic{} ({} envelope unwrap failure{})",
            self.len(),
            if self.len() == 1 { "" } else { "s" },
            self.unwrap_failures(),
            if self.unwrap_failures() == 1 { "" } else { "s" },
        )
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> Diagnostic {
        Diagnostic::EnvelopeUnwrapFailure {
            path: "/gas_price".into(),
            method_name: "gas_price".into(),
            role: Role::Response,
            reason: "no branch carries a result".into(),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            failure().to_string(),
            "/gas_price (gas_price): response envelope could not be unwrapped: no branch carries a result"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut diags = Diagnostics::default();
        assert_eq!(diags.summary(), "no diagnostics");
        diags.push(failure());
        diags.push(Diagnostic::OracleUnavailable {
            reason: "missing".into(),
        });
        assert_eq!(diags.summary(), "2 diagnostics (1 envelope unwrap failure)");
    }

    #[test]
    fn test_serialize_tagged() {
        let value = serde_json::to_value(failure()).unwrap();
        assert_eq!(value["kind"], "envelope-unwrap-failure");
        assert_eq!(value["role"], "response");
    }
}
