#![deny(missing_docs)]

//! # TypeScript Renderer
//!
//! Renders schema shapes as TypeScript type expressions. Composite expressions
//! are always parenthesized so they can be nested without precedence issues.

use crate::emit::{doc_comment, RenderedField, Renderer};
use crate::naming::{NameKind, NameResolver};
use crate::schema::Primitive;
use serde_json::Value;

/// TypeScript syntax.
#[derive(Debug, Clone)]
pub struct TypeScriptRenderer<'a> {
    resolver: &'a NameResolver,
}

impl<'a> TypeScriptRenderer<'a> {
    /// Creates a renderer naming references through `resolver`.
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self { resolver }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn literal(value: &Value) -> String {
    match value {
        // Objects and arrays are not valid literal types.
        Value::Object(_) | Value::Array(_) => "unknown".to_string(),
        other => other.to_string(),
    }
}

impl Renderer for TypeScriptRenderer<'_> {
    fn kind(&self) -> NameKind {
        NameKind::Type
    }

    fn declared_name(&self, schema_name: &str) -> String {
        self.resolver.canonical_name(schema_name, NameKind::Type)
    }

    fn primitive(&self, primitive: Primitive) -> String {
        match primitive {
            Primitive::String => "string",
            Primitive::Number | Primitive::Integer => "number",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
        }
        .to_string()
    }

    fn reference(&self, target: &str) -> String {
        self.declared_name(target)
    }

    fn array(&self, item: String) -> String {
        format!("Array<{}>", item)
    }

    fn object(&self, fields: Vec<RenderedField>, _closed: bool, depth: usize) -> String {
        let inner = indent(depth + 1);
        let mut out = String::from("{\n");
        for field in fields {
            out.push_str(&doc_comment(field.description.as_deref(), &inner));
            let marker = if field.optional { "?" } else { "" };
            out.push_str(&format!("{}{}{}: {};\n", inner, field.key, marker, field.value));
        }
        out.push_str(&indent(depth));
        out.push('}');
        out
    }

    fn map(&self, value: String) -> String {
        format!("Record<string, {}>", value)
    }

    fn union(&self, mut branches: Vec<String>) -> String {
        if branches.len() == 1 {
            return branches.remove(0);
        }
        format!("({})", branches.join(" | "))
    }

    fn intersection(&self, mut parts: Vec<String>) -> String {
        if parts.len() == 1 {
            return parts.remove(0);
        }
        format!("({})", parts.join(" & "))
    }

    fn enumeration(&self, values: &[Value]) -> String {
        let literals: Vec<String> = values.iter().map(literal).collect();
        self.union(literals)
    }

    fn nullable(&self, inner: String) -> String {
        format!("({} | null)", inner)
    }

    fn unknown(&self) -> String {
        "unknown".to_string()
    }

    fn alias_body(&self, target: &str) -> String {
        target.to_string()
    }

    fn declaration(&self, name: &str, body: &str, description: Option<&str>) -> String {
        format!(
            "{}export type {} = {};\n",
            doc_comment(description, ""),
            name,
            body
        )
    }
}
