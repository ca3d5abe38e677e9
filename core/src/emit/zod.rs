#![deny(missing_docs)]

//! # Zod Renderer
//!
//! Renders schema shapes as Zod validator construction expressions.
//!
//! Every validator is exported as a zero-argument constructor and every
//! reference is wrapped in `z.lazy`, so declaration order never matters and
//! self-referencing schemas do not recurse at module load.

use crate::emit::{doc_comment, RenderedField, Renderer};
use crate::naming::{NameKind, NameResolver};
use crate::schema::Primitive;
use serde_json::Value;

/// Zod syntax.
#[derive(Debug, Clone)]
pub struct ZodRenderer<'a> {
    resolver: &'a NameResolver,
}

impl<'a> ZodRenderer<'a> {
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
        Value::Object(_) | Value::Array(_) => "z.unknown()".to_string(),
        other => format!("z.literal({})", other),
    }
}

impl Renderer for ZodRenderer<'_> {
    fn kind(&self) -> NameKind {
        NameKind::Validator
    }

    fn declared_name(&self, schema_name: &str) -> String {
        self.resolver.canonical_name(schema_name, NameKind::Validator)
    }

    fn primitive(&self, primitive: Primitive) -> String {
        match primitive {
            Primitive::String => "z.string()",
            Primitive::Number => "z.number()",
            Primitive::Integer => "z.number().int()",
            Primitive::Boolean => "z.boolean()",
            Primitive::Null => "z.null()",
        }
        .to_string()
    }

    fn reference(&self, target: &str) -> String {
        format!("z.lazy(() => {}())", self.declared_name(target))
    }

    fn array(&self, item: String) -> String {
        format!("z.array({})", item)
    }

    fn object(&self, fields: Vec<RenderedField>, closed: bool, depth: usize) -> String {
        let inner = indent(depth + 1);
        let mut out = String::from("z.object({\n");
        for field in fields {
            out.push_str(&doc_comment(field.description.as_deref(), &inner));
            let optional = if field.optional { ".optional()" } else { "" };
            out.push_str(&format!("{}{}: {}{},\n", inner, field.key, field.value, optional));
        }
        out.push_str(&indent(depth));
        out.push_str("})");
        if closed {
            out.push_str(".strict()");
        }
        out
    }

    fn map(&self, value: String) -> String {
        format!("z.record(z.string(), {})", value)
    }

    fn union(&self, mut branches: Vec<String>) -> String {
        if branches.len() == 1 {
            return branches.remove(0);
        }
        format!("z.union([{}])", branches.join(", "))
    }

    fn intersection(&self, parts: Vec<String>) -> String {
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return self.unknown();
        };
        parts.fold(first, |acc, part| format!("z.intersection({}, {})", acc, part))
    }

    fn enumeration(&self, values: &[Value]) -> String {
        if values.len() > 1 && values.iter().all(Value::is_string) {
            let members: Vec<String> = values.iter().map(Value::to_string).collect();
            return format!("z.enum([{}])", members.join(", "));
        }
        self.union(values.iter().map(literal).collect())
    }

    fn nullable(&self, inner: String) -> String {
        format!("{}.nullable()", inner)
    }

    fn unknown(&self) -> String {
        "z.unknown()".to_string()
    }

    fn alias_body(&self, target: &str) -> String {
        format!("{}()", target)
    }

    fn declaration(&self, name: &str, body: &str, description: Option<&str>) -> String {
        format!(
            "{}export const {} = () => {};\n",
            doc_comment(description, ""),
            name,
            body
        )
    }
}
