#![deny(missing_docs)]

//! # Schema Model
//!
//! The normalized, tagged-union form of a schema node. Every schema-to-schema
//! edge is a [`SchemaKind::Reference`] by name; nothing here points at another
//! node directly, so cyclic documents are plain trees.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Scalar schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `type: string`
    String,
    /// `type: number`
    Number,
    /// `type: integer`
    Integer,
    /// `type: boolean`
    Boolean,
    /// `type: null`, or an enum of exactly `[null]`.
    Null,
}

/// Shape of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    /// Declared properties, in document order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Names listed in `required`.
    pub required: IndexSet<String>,
    /// False only when `additionalProperties: false`.
    pub open_ended: bool,
    /// The `additionalProperties` sub-schema, when one is given.
    pub additional: Option<Box<SchemaNode>>,
}

impl ObjectShape {
    /// Returns true if `name` is in the `required` set.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// A `oneOf`/`anyOf` node, with any properties declared alongside the branches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionShape {
    /// The alternatives.
    pub branches: Vec<SchemaNode>,
    /// Fields that every alternative also carries.
    pub shared: Option<ObjectShape>,
}

/// The variant part of a [`SchemaNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A scalar.
    Primitive(Primitive),
    /// A homogeneous list.
    Array(Box<SchemaNode>),
    /// A record or an open map.
    Object(ObjectShape),
    /// One of several shapes.
    Union(UnionShape),
    /// All of several shapes.
    Intersection(Vec<SchemaNode>),
    /// A closed set of literal values.
    Enum(Vec<Value>),
    /// A by-name edge to another entry of `components/schemas`.
    Reference(String),
    /// Anything the normalizer did not recognize.
    Unknown,
}

/// A normalized schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// The node's shape.
    pub kind: SchemaKind,
    /// Whether `null` is accepted in addition to `kind`.
    pub nullable: bool,
    /// Free-text description.
    pub description: Option<String>,
}

impl SchemaNode {
    /// Creates a non-nullable node without description.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Shorthand for a reference node.
    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(target.into()))
    }

    /// Shorthand for an unknown leaf.
    pub fn unknown() -> Self {
        Self::new(SchemaKind::Unknown)
    }

    /// Returns the target name if this node is a reference.
    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Looks up a property declared directly on this node.
    ///
    /// Searches object properties, the shared properties of a union, and the
    /// parts of an intersection. References are not followed.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Object(shape) => shape.properties.get(name),
            SchemaKind::Union(union) => union
                .shared
                .as_ref()
                .and_then(|shape| shape.properties.get(name)),
            SchemaKind::Intersection(parts) => parts.iter().find_map(|p| p.property(name)),
            _ => None,
        }
    }

    /// Returns the first reference reached from this node.
    ///
    /// A reference returns itself; unions and intersections are searched in
    /// order. Stops at the first hit and never follows the reference.
    pub fn first_reference(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(name) => Some(name),
            SchemaKind::Union(union) => union.branches.iter().find_map(|b| b.first_reference()),
            SchemaKind::Intersection(parts) => parts.iter().find_map(|p| p.first_reference()),
            _ => None,
        }
    }

    /// Collects the names of all schemas referenced anywhere below this node.
    pub fn referenced_names(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        collect_references(self, &mut out);
        out
    }
}

fn collect_references(node: &SchemaNode, out: &mut IndexSet<String>) {
    match &node.kind {
        SchemaKind::Reference(name) => {
            out.insert(name.clone());
        }
        SchemaKind::Array(item) => collect_references(item, out),
        SchemaKind::Object(shape) => collect_shape_references(shape, out),
        SchemaKind::Union(union) => {
            for branch in &union.branches {
                collect_references(branch, out);
            }
            if let Some(shape) = &union.shared {
                collect_shape_references(shape, out);
            }
        }
        SchemaKind::Intersection(parts) => {
            for part in parts {
                collect_references(part, out);
            }
        }
        SchemaKind::Primitive(_) | SchemaKind::Enum(_) | SchemaKind::Unknown => {}
    }
}

fn collect_shape_references(shape: &ObjectShape, out: &mut IndexSet<String>) {
    for prop in shape.properties.values() {
        collect_references(prop, out);
    }
    if let Some(additional) = &shape.additional {
        collect_references(additional, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(props: &[(&str, SchemaNode)]) -> SchemaNode {
        let mut shape = ObjectShape {
            open_ended: true,
            ..Default::default()
        };
        for (name, node) in props {
            shape.properties.insert(name.to_string(), node.clone());
        }
        SchemaNode::new(SchemaKind::Object(shape))
    }

    #[test]
    fn test_property_lookup_through_intersection() {
        let envelope = SchemaNode::new(SchemaKind::Intersection(vec![
            object(&[("id", SchemaNode::new(SchemaKind::Primitive(Primitive::String)))]),
            object(&[("params", SchemaNode::reference("RpcBlockRequest"))]),
        ]));
        let params = envelope.property("params").unwrap();
        assert_eq!(params.reference_target(), Some("RpcBlockRequest"));
        assert!(envelope.property("result").is_none());
    }

    #[test]
    fn test_first_reference_skips_null_branch() {
        let nullable = SchemaNode::new(SchemaKind::Union(UnionShape {
            branches: vec![
                SchemaNode::new(SchemaKind::Primitive(Primitive::Null)),
                SchemaNode::reference("Block"),
                SchemaNode::reference("Other"),
            ],
            shared: None,
        }));
        assert_eq!(nullable.first_reference(), Some("Block"));
    }

    #[test]
    fn test_referenced_names_in_order() {
        let node = object(&[
            ("a", SchemaNode::reference("B")),
            (
                "list",
                SchemaNode::new(SchemaKind::Array(Box::new(SchemaNode::reference("A")))),
            ),
            ("again", SchemaNode::reference("B")),
        ]);
        let names: Vec<_> = node.referenced_names().into_iter().collect();
        assert_eq!(names, vec!["B".to_string(), "A".to_string()]);
    }
}
