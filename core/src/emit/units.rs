#![deny(missing_docs)]

//! # Declaration Units
//!
//! A unit collects the top-level declarations of one artifact and tracks the
//! names they claim.

use crate::error::{AppError, AppResult};
use crate::naming::NameKind;
use indexmap::IndexMap;

/// Exported names of one namespace and the source identifier that claimed each.
#[derive(Debug, Clone)]
pub struct Namespace {
    label: &'static str,
    owners: IndexMap<String, String>,
}

impl Namespace {
    /// Creates an empty namespace. `label` appears in collision errors.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            owners: IndexMap::new(),
        }
    }

    /// The namespace of declarations of the given kind.
    pub fn for_kind(kind: NameKind) -> Self {
        match kind {
            NameKind::Type => Self::new("types"),
            NameKind::Validator => Self::new("validators"),
        }
    }

    /// Claims `name` for `source`.
    ///
    /// Re-declaring a name from the same source is a no-op; a different
    /// source is a [`AppError::NameCollision`].
    pub fn declare(&mut self, name: &str, source: &str) -> AppResult<()> {
        match self.owners.get(name) {
            Some(owner) if owner == source => Ok(()),
            Some(owner) => Err(AppError::NameCollision {
                namespace: self.label.to_string(),
                canonical: name.to_string(),
                first: owner.clone(),
                second: source.to_string(),
            }),
            None => {
                self.owners.insert(name.to_string(), source.to_string());
                Ok(())
            }
        }
    }

    /// Returns true if `name` is claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// The source identifier that claimed `name`.
    pub fn source_of(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// Claimed names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }
}

/// Rendered declarations of one artifact.
#[derive(Debug, Clone)]
pub struct DeclarationUnit {
    /// Names claimed by `declarations`.
    pub namespace: Namespace,
    declarations: Vec<String>,
}

impl DeclarationUnit {
    /// Creates an empty unit for the given namespace.
    pub fn new(kind: NameKind) -> Self {
        Self {
            namespace: Namespace::for_kind(kind),
            declarations: Vec::new(),
        }
    }

    /// Appends a rendered declaration.
    pub fn push(&mut self, declaration: String) {
        self.declarations.push(declaration);
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if the unit has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Appends all declarations of `other`, merging its namespace.
    pub fn extend(&mut self, other: DeclarationUnit) -> AppResult<()> {
        for (name, source) in &other.namespace.owners {
            self.namespace.declare(name, source)?;
        }
        self.declarations.extend(other.declarations);
        Ok(())
    }

    /// The declarations separated by blank lines.
    pub fn body(&self) -> String {
        self.declarations.join("\n")
    }

    /// The complete artifact: preamble, then the declarations.
    pub fn render(&self, preamble: &str) -> String {
        let mut out = String::from(preamble);
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push('\n');
        }
        out.push_str(&self.body());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_detects_collisions() {
        let mut ns = Namespace::new("types");
        ns.declare("FooBar", "foo_bar").unwrap();
        ns.declare("FooBar", "foo_bar").unwrap();
        match ns.declare("FooBar", "FooBar").unwrap_err() {
            AppError::NameCollision {
                namespace,
                first,
                second,
                ..
            } => {
                assert_eq!(namespace, "types");
                assert_eq!(first, "foo_bar");
                assert_eq!(second, "FooBar");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(ns.source_of("FooBar"), Some("foo_bar"));
    }

    #[test]
    fn test_unit_render_and_extend() {
        let mut unit = DeclarationUnit::new(NameKind::Type);
        unit.namespace.declare("A", "a").unwrap();
        unit.push("export type A = string;\n".into());

        let mut more = DeclarationUnit::new(NameKind::Type);
        more.namespace.declare("B", "b").unwrap();
        more.push("export type B = A;\n".into());
        unit.extend(more).unwrap();

        assert_eq!(unit.len(), 2);
        assert_eq!(
            unit.render("// header\n"),
            "// header\n\nexport type A = string;\n\nexport type B = A;\n"
        );

        let mut clash = DeclarationUnit::new(NameKind::Type);
        clash.namespace.declare("A", "other").unwrap();
        assert!(unit.extend(clash).is_err());
    }
}
