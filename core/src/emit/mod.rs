#![deny(missing_docs)]

//! # Emitters
//!
//! Schema nodes are rendered by one shared traversal ([`Emitter`]) driving a
//! [`Renderer`]. The TypeScript and Zod renderers only decide syntax, so both
//! artifacts always agree on structure and on which schemas they reference.
//!
//! ```text
//! SchemaNode ──> Emitter (depth guard, field naming, union ∧ shared fields)
//!                   ├─> TypeScriptRenderer ──> `export type X = ...;`
//!                   └─> ZodRenderer        ──> `export const XSchema = () => ...;`
//! ```

pub mod typescript;
pub mod units;
pub mod zod;

use crate::error::AppResult;
use crate::naming::case::property_key;
use crate::naming::NameKind;
use crate::schema::{ObjectShape, Primitive, SchemaKind, SchemaNode};
use crate::store::SchemaStore;
use indexmap::IndexSet;
use serde_json::Value;

pub use typescript::TypeScriptRenderer;
pub use units::{DeclarationUnit, Namespace};
pub use zod::ZodRenderer;

/// Default nesting depth after which a node renders as unknown.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// One object property, already rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    /// Target-language key (case-converted, quoted if needed).
    pub key: String,
    /// Rendered value type / validator.
    pub value: String,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Field description.
    pub description: Option<String>,
}

/// Target-language syntax for each schema shape.
pub trait Renderer {
    /// Namespace the rendered declarations live in.
    fn kind(&self) -> NameKind;

    /// Exported name of the declaration for a schema identifier.
    fn declared_name(&self, schema_name: &str) -> String;

    /// A scalar.
    fn primitive(&self, primitive: Primitive) -> String;

    /// A by-name edge to another schema.
    fn reference(&self, target: &str) -> String;

    /// A list of `item`.
    fn array(&self, item: String) -> String;

    /// A record with declared fields. `depth` is the nesting level of the object.
    fn object(&self, fields: Vec<RenderedField>, closed: bool, depth: usize) -> String;

    /// A string-keyed open map.
    fn map(&self, value: String) -> String;

    /// One of `branches` (never empty).
    fn union(&self, branches: Vec<String>) -> String;

    /// All of `parts` (never empty).
    fn intersection(&self, parts: Vec<String>) -> String;

    /// A closed set of literals (never empty).
    fn enumeration(&self, values: &[Value]) -> String;

    /// `inner` or null.
    fn nullable(&self, inner: String) -> String;

    /// The placeholder for anything unrecognized or too deep.
    fn unknown(&self) -> String;

    /// Body of a declaration that aliases another declaration of this namespace.
    fn alias_body(&self, target: &str) -> String;

    /// A complete top-level declaration.
    fn declaration(&self, name: &str, body: &str, description: Option<&str>) -> String;
}

/// The shared traversal.
#[derive(Debug, Clone)]
pub struct Emitter<R> {
    renderer: R,
    max_depth: usize,
}

/// Emits TypeScript type expressions.
pub type TypeEmitter<'a> = Emitter<TypeScriptRenderer<'a>>;

/// Emits Zod validator construction expressions.
pub type ValidatorEmitter<'a> = Emitter<ZodRenderer<'a>>;

impl<R: Renderer> Emitter<R> {
    /// Creates an emitter with the given depth cap.
    pub fn new(renderer: R, max_depth: usize) -> Self {
        Self {
            renderer,
            max_depth,
        }
    }

    /// The underlying renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Renders `node` found at nesting level `depth`.
    pub fn emit(&self, node: &SchemaNode, depth: usize) -> String {
        let mut references = IndexSet::new();
        self.walk(node, depth, &mut references)
    }

    /// Renders `node` and reports the schema names its rendering references.
    pub fn emit_with_references(&self, node: &SchemaNode) -> (String, IndexSet<String>) {
        let mut references = IndexSet::new();
        let rendered = self.walk(node, 0, &mut references);
        (rendered, references)
    }

    /// Emits one declaration per schema of the store, in document order.
    ///
    /// Fails with a name collision if two schemas map to the same exported name.
    pub fn declare_schemas(&self, store: &SchemaStore) -> AppResult<DeclarationUnit> {
        let mut unit = DeclarationUnit::new(self.renderer.kind());
        for (name, node) in store.schemas() {
            let declared = self.renderer.declared_name(name);
            unit.namespace.declare(&declared, name)?;
            let body = self.emit(node, 0);
            unit.push(
                self.renderer
                    .declaration(&declared, &body, node.description.as_deref()),
            );
        }
        Ok(unit)
    }

    /// Renders a declaration `name` that aliases `target`.
    pub fn alias(&self, name: &str, target: &str, description: Option<&str>) -> String {
        self.renderer
            .declaration(name, &self.renderer.alias_body(target), description)
    }

    /// Renders a declaration `name` of the unknown placeholder.
    pub fn unknown_declaration(&self, name: &str, description: Option<&str>) -> String {
        self.renderer
            .declaration(name, &self.renderer.unknown(), description)
    }

    fn walk(&self, node: &SchemaNode, depth: usize, refs: &mut IndexSet<String>) -> String {
        if depth > self.max_depth {
            return self.renderer.unknown();
        }

        let rendered = match &node.kind {
            SchemaKind::Primitive(p) => self.renderer.primitive(*p),
            SchemaKind::Reference(target) => {
                refs.insert(target.clone());
                self.renderer.reference(target)
            }
            SchemaKind::Array(item) => {
                let item = self.walk(item, depth + 1, refs);
                self.renderer.array(item)
            }
            SchemaKind::Object(shape) if shape.properties.is_empty() => {
                let value = match &shape.additional {
                    Some(additional) => self.walk(additional, depth + 1, refs),
                    None => self.renderer.unknown(),
                };
                self.renderer.map(value)
            }
            SchemaKind::Object(shape) => self.object(shape, depth, refs),
            // Branches and parts sit at the level of the composition itself.
            SchemaKind::Union(union) => {
                let shared = union
                    .shared
                    .as_ref()
                    .filter(|shape| !shape.properties.is_empty());
                let branches: Vec<String> = union
                    .branches
                    .iter()
                    .map(|b| self.walk(b, depth, refs))
                    .collect();
                match (branches.is_empty(), shared) {
                    (true, None) => self.renderer.unknown(),
                    (true, Some(shape)) => self.object(shape, depth, refs),
                    (false, None) => self.renderer.union(branches),
                    (false, Some(shape)) => {
                        let alternatives = self.renderer.union(branches);
                        let common = self.object(shape, depth, refs);
                        self.renderer.intersection(vec![alternatives, common])
                    }
                }
            }
            SchemaKind::Intersection(parts) if parts.is_empty() => self.renderer.unknown(),
            SchemaKind::Intersection(parts) => {
                let parts = parts
                    .iter()
                    .map(|p| self.walk(p, depth, refs))
                    .collect();
                self.renderer.intersection(parts)
            }
            SchemaKind::Enum(values) if values.is_empty() => self.renderer.unknown(),
            SchemaKind::Enum(values) => self.renderer.enumeration(values),
            SchemaKind::Unknown => self.renderer.unknown(),
        };

        let is_null = matches!(node.kind, SchemaKind::Primitive(Primitive::Null));
        if node.nullable && !is_null {
            self.renderer.nullable(rendered)
        } else {
            rendered
        }
    }

    fn object(&self, shape: &ObjectShape, depth: usize, refs: &mut IndexSet<String>) -> String {
        let fields = shape
            .properties
            .iter()
            .map(|(name, prop)| RenderedField {
                key: property_key(name),
                value: self.walk(prop, depth + 1, refs),
                optional: !shape.is_required(name),
                description: prop.description.clone(),
            })
            .collect();
        self.renderer.object(fields, !shape.open_ended, depth)
    }
}

/// Renders a JSDoc block at the given indentation.
pub(crate) fn doc_comment(description: Option<&str>, indent: &str) -> String {
    let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let text = text.replace("*/", "*\\/");
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() == 1 {
        return format!("{}/** {} */\n", indent, lines[0]);
    }
    let mut out = format!("{}/**\n", indent);
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            out.push_str(&format!("{} *\n", indent));
        } else {
            out.push_str(&format!("{} * {}\n", indent, line));
        }
    }
    out.push_str(&format!("{} */\n", indent));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_comment_single_and_multi_line() {
        assert_eq!(doc_comment(None, ""), "");
        assert_eq!(doc_comment(Some("  "), ""), "");
        assert_eq!(doc_comment(Some("Block hash"), "  "), "  /** Block hash */\n");
        assert_eq!(
            doc_comment(Some("First\n\nSecond"), ""),
            "/**\n * First\n *\n * Second\n */\n"
        );
        assert_eq!(doc_comment(Some("a */ b"), ""), "/** a *\\/ b */\n");
    }
}
