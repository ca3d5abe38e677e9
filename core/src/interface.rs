#![deny(missing_docs)]

//! # Method Interface
//!
//! Emits the client-facing interface: one signature per operation, plus the
//! list of wire method names.
//!
//! Wire names become member identifiers: `EXPERIMENTAL_changes` becomes
//! `experimentalChanges`, `gas_price` becomes `gasPrice`.

use crate::binder::BoundMethod;
use crate::emit::{doc_comment, Namespace};
use crate::error::AppResult;
use crate::naming::case::{
    is_valid_identifier, quote, sanitize_identifier, to_camel_case, to_pascal_case,
};

/// Names used by the interface module.
#[derive(Debug, Clone)]
pub struct MethodInterfaceEmitter<'a> {
    /// Wire prefix marking experimental methods.
    pub experimental_prefix: &'a str,
    /// Name of the exported interface.
    pub interface_name: &'a str,
    /// Name of the exported method-name list.
    pub method_list_name: &'a str,
    /// Name of the exported method-name union type.
    pub method_type_name: &'a str,
}

impl Default for MethodInterfaceEmitter<'_> {
    fn default() -> Self {
        Self {
            experimental_prefix: "EXPERIMENTAL_",
            interface_name: "RpcMethods",
            method_list_name: "RPC_METHODS",
            method_type_name: "RpcMethod",
        }
    }
}

impl MethodInterfaceEmitter<'_> {
    /// The interface member identifier for a wire method name.
    pub fn method_identifier(&self, wire: &str) -> String {
        if !self.experimental_prefix.is_empty() {
            if let Some(rest) = wire
                .strip_prefix(self.experimental_prefix)
                .filter(|rest| !rest.is_empty())
            {
                return sanitize_identifier(&format!("experimental{}", to_pascal_case(rest)));
            }
        }

        let camel = to_camel_case(wire);
        if is_valid_identifier(&camel) {
            return camel;
        }
        let pascal = to_pascal_case(wire);
        let mut chars = pascal.chars();
        let lowered = match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        };
        sanitize_identifier(&lowered)
    }

    /// Renders the interface module.
    ///
    /// `types_module` is the import path of the type unit. Fails when two wire
    /// names map to the same member identifier.
    pub fn render(&self, methods: &[BoundMethod], types_module: &str) -> AppResult<String> {
        let mut members = Namespace::new("methods");
        let mut out = format!("import type * as types from {};\n\n", quote(types_module));

        out.push_str(&format!("export interface {} {{\n", self.interface_name));
        for method in methods {
            let ident = self.method_identifier(&method.method_name);
            members.declare(&ident, &method.method_name)?;

            let mut doc = method.summary.clone().unwrap_or_default();
            if method.deprecated {
                if !doc.is_empty() {
                    doc.push_str("\n\n");
                }
                doc.push_str("@deprecated");
            }
            out.push_str(&doc_comment(Some(&doc), "  "));
            out.push_str(&format!(
                "  {}(params: types.{}): Promise<types.{}>;\n",
                ident,
                method.request.type_name.canonical_name,
                method.response.type_name.canonical_name
            ));
        }
        out.push_str("}\n\n");

        if methods.is_empty() {
            out.push_str(&format!("export const {} = [] as const;\n\n", self.method_list_name));
        } else {
            out.push_str(&format!("export const {} = [\n", self.method_list_name));
            for method in methods {
                out.push_str(&format!("  {},\n", quote(&method.method_name)));
            }
            out.push_str("] as const;\n\n");
        }
        out.push_str(&format!(
            "export type {} = (typeof {})[number];\n",
            self.method_type_name, self.method_list_name
        ));
        Ok(out)
    }
}
