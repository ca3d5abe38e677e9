#![deny(missing_docs)]

//! # Operation Declarations
//!
//! Declares the per-operation names `PascalCase(method) + Request|Response`
//! (and their validator counterparts) next to the schema declarations, so each
//! operation side can be referred to by a predictable name.

use crate::binder::{BoundMethod, SchemaRef};
use crate::emit::{DeclarationUnit, Emitter, Renderer};
use crate::error::AppResult;
use crate::naming::{NameBinding, NameKind, NameResolver, Role};
use indexmap::IndexSet;

/// Appends the operation declarations of `methods` to `unit`.
///
/// * A resolved side is declared as an alias of its bound name. A bound name
///   that only exists in an external type source is first declared as an
///   alias of the schema's own declaration.
/// * An unresolved side is declared as the unknown placeholder, unless a
///   schema already claims the name.
///
/// Fails with a name collision when an operation name is taken by a
/// different source, including another operation.
pub fn declare_operations<R: Renderer>(
    methods: &[BoundMethod],
    emitter: &Emitter<R>,
    resolver: &NameResolver,
    unit: &mut DeclarationUnit,
) -> AppResult<()> {
    let kind = emitter.renderer().kind();
    let mut operation_sources: IndexSet<String> = IndexSet::new();
    for method in methods {
        for role in [Role::Request, Role::Response] {
            let side = method.side(role);
            let name = resolver.operation_name(&method.method_name, role, kind);
            let source = format!("{}.{}", method.method_name, role);

            let binding = match kind {
                NameKind::Type => Some(&side.type_name),
                NameKind::Validator => side.validator_name.as_ref(),
            };

            match (&side.schema, binding) {
                (SchemaRef::Resolved(schema), Some(binding)) => {
                    declare_bound(emitter, unit, schema, binding)?;
                    if name != binding.canonical_name {
                        unit.namespace.declare(&name, &source)?;
                        unit.push(emitter.alias(&name, &binding.canonical_name, None));
                    }
                }
                _ => {
                    let owned_by_schema = unit
                        .namespace
                        .source_of(&name)
                        .is_some_and(|owner| !operation_sources.contains(owner));
                    if !owned_by_schema {
                        // Fails if another operation already claimed the name.
                        unit.namespace.declare(&name, &source)?;
                        let doc = format!(
                            "`{}` has no discoverable {} schema.",
                            method.method_name, role
                        );
                        unit.push(emitter.unknown_declaration(&name, Some(&doc)));
                    }
                }
            }
            operation_sources.insert(source);
        }
    }
    Ok(())
}

fn declare_bound<R: Renderer>(
    emitter: &Emitter<R>,
    unit: &mut DeclarationUnit,
    schema: &str,
    binding: &NameBinding,
) -> AppResult<()> {
    if unit.namespace.contains(&binding.canonical_name) {
        return Ok(());
    }
    let own = emitter.renderer().declared_name(schema);
    unit.namespace.declare(&binding.canonical_name, schema)?;
    unit.push(emitter.alias(&binding.canonical_name, &own, None));
    Ok(())
}
