#![deny(missing_docs)]

//! # Name Resolution
//!
//! Maps schema and method identifiers to canonical exported names.
//!
//! Resolution is a pure function of its inputs. With a known-names set the
//! resolver tries, in order, the identifier as-is, the identifier without the
//! protocol prefix and the identifier with the prefix added. Otherwise it falls
//! back to a deterministic PascalCase rendering.

use crate::naming::case::{is_valid_identifier, sanitize_identifier, to_pascal_case};
use crate::naming::oracle::TypeNameOracle;
use serde::Serialize;

/// Which namespace a name is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Type declarations.
    Type,
    /// Validator constructors.
    Validator,
}

/// Side of an operation a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The request parameters.
    Request,
    /// The response result.
    Response,
}

impl Role {
    /// Suffix appended to operation-derived names.
    pub fn suffix(self) -> &'static str {
        match self {
            Role::Request => "Request",
            Role::Response => "Response",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Request => write!(f, "request"),
            Role::Response => write!(f, "response"),
        }
    }
}

/// How a canonical name was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStrategy {
    /// The identifier itself is a known name.
    ExactMatch,
    /// The identifier without the protocol prefix is a known name.
    PrefixStripped,
    /// The identifier with the protocol prefix is a known name.
    PrefixAdded,
    /// No known name matched; casing heuristics were applied.
    HeuristicFallback,
}

/// The outcome of resolving one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameBinding {
    /// The identifier that was resolved.
    pub source_identifier: String,
    /// The exported name.
    pub canonical_name: String,
    /// How `canonical_name` was chosen.
    pub strategy: ResolutionStrategy,
}

/// Canonical-name resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolver {
    prefix: String,
    validator_suffix: String,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new("Rpc", "Schema")
    }
}

impl NameResolver {
    /// Creates a resolver for the given protocol prefix and validator suffix.
    pub fn new(prefix: impl Into<String>, validator_suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            validator_suffix: validator_suffix.into(),
        }
    }

    /// The suffix appended to validator names.
    pub fn validator_suffix(&self) -> &str {
        &self.validator_suffix
    }

    fn kind_suffix(&self, kind: NameKind) -> &str {
        match kind {
            NameKind::Type => "",
            NameKind::Validator => &self.validator_suffix,
        }
    }

    /// The heuristic type name of a schema identifier.
    pub fn canonical_type_name(&self, identifier: &str) -> String {
        let pascal = to_pascal_case(identifier);
        if is_valid_identifier(&pascal) {
            pascal
        } else {
            sanitize_identifier(&pascal)
        }
    }

    /// The heuristic name of a schema identifier in the given namespace.
    pub fn canonical_name(&self, identifier: &str, kind: NameKind) -> String {
        format!(
            "{}{}",
            self.canonical_type_name(identifier),
            self.kind_suffix(kind)
        )
    }

    /// Resolves `identifier` against an optional set of known names.
    ///
    /// Never fails; without a match the heuristic name is returned.
    pub fn resolve(
        &self,
        identifier: &str,
        kind: NameKind,
        known: Option<&TypeNameOracle>,
    ) -> NameBinding {
        let suffix = self.kind_suffix(kind);

        if let Some(known) = known {
            let mut candidates = vec![(identifier.to_string(), ResolutionStrategy::ExactMatch)];
            if !self.prefix.is_empty() {
                if let Some(stripped) = identifier
                    .strip_prefix(self.prefix.as_str())
                    .filter(|rest| !rest.is_empty())
                {
                    candidates.push((stripped.to_string(), ResolutionStrategy::PrefixStripped));
                }
                candidates.push((
                    format!("{}{}", self.prefix, identifier),
                    ResolutionStrategy::PrefixAdded,
                ));
            }

            for (candidate, strategy) in candidates {
                let name = format!("{}{}", candidate, suffix);
                if known.contains(&name) && is_valid_identifier(&name) {
                    return NameBinding {
                        source_identifier: identifier.to_string(),
                        canonical_name: name,
                        strategy,
                    };
                }
            }
        }

        NameBinding {
            source_identifier: identifier.to_string(),
            canonical_name: self.canonical_name(identifier, kind),
            strategy: ResolutionStrategy::HeuristicFallback,
        }
    }

    /// The name used for an operation side that has no discoverable schema:
    /// `PascalCase(method) + Request|Response`.
    pub fn operation_name(&self, method_name: &str, role: Role, kind: NameKind) -> String {
        let base = format!("{}{}", to_pascal_case(method_name), role.suffix());
        let base = if is_valid_identifier(&base) {
            base
        } else {
            sanitize_identifier(&base)
        };
        format!("{}{}", base, self.kind_suffix(kind))
    }

    /// Fallback binding for an operation side.
    pub fn operation_fallback(&self, method_name: &str, role: Role, kind: NameKind) -> NameBinding {
        NameBinding {
            source_identifier: method_name.to_string(),
            canonical_name: self.operation_name(method_name, role, kind),
            strategy: ResolutionStrategy::HeuristicFallback,
        }
    }
}
