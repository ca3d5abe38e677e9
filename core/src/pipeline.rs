#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Runs the stages in order over a loaded [`SchemaStore`]:
//!
//! 1. Emit schema declarations (types, then validators).
//! 2. Pick the known-names sets (external source or introspection).
//! 3. Bind methods.
//! 4. Emit operation declarations.
//! 5. Build the validation map and the method interface.
//! 6. Assemble artifacts (and the manifest).
//!
//! Everything is sequential and iterates in document order, so identical
//! input yields byte-identical output.

use crate::binder::{BoundMethod, MethodBinder};
use crate::config::{module_path, GeneratorConfig};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::emit::{DeclarationUnit, Emitter, TypeScriptRenderer, ZodRenderer};
use crate::error::{AppError, AppResult};
use crate::interface::MethodInterfaceEmitter;
use crate::naming::{NameResolver, OracleState, TypeNameOracle};
use crate::operations::declare_operations;
use crate::store::SchemaStore;
use crate::validation_map::ValidationMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// First line of every generated TypeScript file.
pub const GENERATED_HEADER: &str = "// This file is generated by rpcgen. Do not edit by hand.\n";

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, relative to the output directory.
    pub file_name: String,
    /// Full file contents.
    pub contents: String,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Output files, in write order.
    pub artifacts: Vec<Artifact>,
    /// Bound operations.
    pub bindings: Vec<BoundMethod>,
    /// The validation table.
    pub validation_map: ValidationMap,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

impl GenerationOutput {
    /// Contents of the artifact with the given file name.
    pub fn artifact(&self, file_name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.file_name == file_name)
            .map(|a| a.contents.as_str())
    }

    /// Writes every artifact into `dir`, creating it if needed.
    pub fn write_artifacts(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::General(format!("Failed to create output dir {:?}: {}", dir, e))
        })?;

        let mut written = Vec::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            let path = dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.contents)
                .map_err(|e| AppError::General(format!("Failed to write {:?}: {}", path, e)))?;
            tracing::debug!(
                path = %path.display(),
                bytes = artifact.contents.len(),
                "wrote artifact"
            );
            written.push(path);
        }
        Ok(written)
    }
}

struct BoundStage {
    types: DeclarationUnit,
    validators: DeclarationUnit,
    bindings: Vec<BoundMethod>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generator: &'static str,
    version: &'static str,
    schemas: usize,
    methods: &'a [BoundMethod],
    validation: &'a ValidationMap,
    diagnostics: &'a Diagnostics,
}

/// Runs generation with one configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    resolver: NameResolver,
}

impl Generator {
    /// Creates a generator after validating `config`.
    pub fn new(config: GeneratorConfig) -> AppResult<Self> {
        config.validate()?;
        let resolver = NameResolver::new(&config.name_prefix, &config.validator_suffix);
        Ok(Self { config, resolver })
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The resolver built from the configuration.
    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Binds the operations of `store` without assembling artifacts.
    pub fn bind(
        &self,
        store: &SchemaStore,
        oracle: OracleState,
    ) -> AppResult<(Vec<BoundMethod>, Diagnostics)> {
        let mut diagnostics = Diagnostics::default();
        let stage = self.declare_and_bind(store, &oracle, &mut diagnostics)?;
        Ok((stage.bindings, diagnostics))
    }

    fn type_emitter(&self) -> Emitter<TypeScriptRenderer<'_>> {
        Emitter::new(TypeScriptRenderer::new(&self.resolver), self.config.max_depth)
    }

    fn validator_emitter(&self) -> Emitter<ZodRenderer<'_>> {
        Emitter::new(ZodRenderer::new(&self.resolver), self.config.max_depth)
    }

    fn declare_and_bind(
        &self,
        store: &SchemaStore,
        oracle: &OracleState,
        diagnostics: &mut Diagnostics,
    ) -> AppResult<BoundStage> {
        let types = self.type_emitter().declare_schemas(store)?;
        let validators = self.validator_emitter().declare_schemas(store)?;
        tracing::debug!(
            types = types.len(),
            validators = validators.len(),
            "emitted schema declarations"
        );

        let introspected;
        let known_types = match oracle {
            OracleState::Available(names) => {
                tracing::debug!(names = names.len(), "using external type names");
                Some(names)
            }
            OracleState::Unavailable(reason) => {
                tracing::warn!(%reason, "type name source unavailable, using heuristics");
                diagnostics.push(Diagnostic::OracleUnavailable {
                    reason: reason.clone(),
                });
                None
            }
            OracleState::Absent if self.config.introspect_emitted => {
                introspected = TypeNameOracle::scan(&types.body());
                Some(&introspected)
            }
            OracleState::Absent => None,
        };
        let known_validators = TypeNameOracle::scan(&validators.body());

        let bindings = MethodBinder::new(store, &self.resolver)
            .with_known_types(known_types)
            .with_known_validators(Some(&known_validators))
            .bind_all(diagnostics);
        tracing::debug!(methods = bindings.len(), "bound methods");

        Ok(BoundStage {
            types,
            validators,
            bindings,
        })
    }

    /// Runs the full pipeline.
    pub fn generate(
        &self,
        store: &SchemaStore,
        oracle: OracleState,
    ) -> AppResult<GenerationOutput> {
        let config = &self.config;
        let mut diagnostics = Diagnostics::default();
        let BoundStage {
            mut types,
            mut validators,
            bindings,
        } = self.declare_and_bind(store, &oracle, &mut diagnostics)?;

        declare_operations(&bindings, &self.type_emitter(), &self.resolver, &mut types)?;
        declare_operations(
            &bindings,
            &self.validator_emitter(),
            &self.resolver,
            &mut validators,
        )?;

        let validation_map = ValidationMap::build(&bindings);
        let interface = MethodInterfaceEmitter {
            experimental_prefix: &config.experimental_prefix,
            interface_name: &config.interface_name,
            method_list_name: &config.method_list_name,
            method_type_name: &config.method_type_name,
        }
        .render(&bindings, &module_path(&config.types_file))?;

        let mut artifacts = vec![
            Artifact {
                file_name: config.types_file.clone(),
                contents: types.render(GENERATED_HEADER),
            },
            Artifact {
                file_name: config.schemas_file.clone(),
                contents: validators.render(&format!(
                    "{}\nimport {{ z }} from \"zod\";\n",
                    GENERATED_HEADER
                )),
            },
            Artifact {
                file_name: config.validation_file.clone(),
                contents: format!(
                    "{}\n{}",
                    GENERATED_HEADER,
                    validation_map.render(
                        &config.validation_map_name,
                        &module_path(&config.schemas_file)
                    )
                ),
            },
            Artifact {
                file_name: config.methods_file.clone(),
                contents: format!("{}\n{}", GENERATED_HEADER, interface),
            },
        ];

        if let Some(manifest_file) = &config.manifest_file {
            let manifest = Manifest {
                generator: "rpcgen",
                version: env!("CARGO_PKG_VERSION"),
                schemas: store.schemas().len(),
                methods: &bindings,
                validation: &validation_map,
                diagnostics: &diagnostics,
            };
            let json = serde_json::to_string_pretty(&manifest)
                .map_err(|e| AppError::General(format!("Failed to serialize manifest: {}", e)))?;
            artifacts.push(Artifact {
                file_name: manifest_file.clone(),
                contents: format!("{}\n", json),
            });
        }

        if !diagnostics.is_empty() {
            tracing::warn!("{}", diagnostics.summary());
        }

        Ok(GenerationOutput {
            artifacts,
            bindings,
            validation_map,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"
paths:
  /block:
    post:
      operationId: block
      summary: Returns block details.
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/JsonRpcRequest_for_block'
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/JsonRpcResponse_for_RpcBlockResponse'
components:
  schemas:
    JsonRpcRequest_for_block:
      type: object
      properties:
        params:
          $ref: '#/components/schemas/RpcBlockRequest'
    RpcBlockRequest:
      type: object
      properties:
        block_id:
          type: string
    JsonRpcResponse_for_RpcBlockResponse:
      oneOf:
        - properties:
            result:
              $ref: '#/components/schemas/RpcBlockResponse'
        - properties:
            error:
              type: string
    RpcBlockResponse:
      type: object
      properties:
        author:
          type: string
"##;

    #[test]
    fn test_generate_produces_all_artifacts() {
        let store = SchemaStore::from_document_str(DOC).unwrap();
        let output = Generator::new(GeneratorConfig::default())
            .unwrap()
            .generate(&store, OracleState::Absent)
            .unwrap();

        let names: Vec<&str> = output.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["types.ts", "schemas.ts", "validation.ts", "methods.ts", "manifest.json"]
        );
        for artifact in &output.artifacts[..4] {
            assert!(artifact.contents.starts_with(GENERATED_HEADER));
        }

        let types = output.artifact("types.ts").unwrap();
        assert!(types.contains("export type RpcBlockRequest = {\n  blockId?: string;\n};\n"));
        assert!(types.contains("export type BlockResponse = RpcBlockResponse;\n"));

        let schemas = output.artifact("schemas.ts").unwrap();
        assert!(schemas.contains("import { z } from \"zod\";"));
        assert!(schemas.contains("export const BlockRequestSchema = () => RpcBlockRequestSchema();"));

        let methods = output.artifact("methods.ts").unwrap();
        assert!(methods.contains(
            "  block(params: types.RpcBlockRequest): Promise<types.RpcBlockResponse>;"
        ));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_manifest_records_bindings() {
        let store = SchemaStore::from_document_str(DOC).unwrap();
        let output = Generator::new(GeneratorConfig::default())
            .unwrap()
            .generate(&store, OracleState::Absent)
            .unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(output.artifact("manifest.json").unwrap()).unwrap();
        assert_eq!(manifest["generator"], "rpcgen");
        assert_eq!(manifest["schemas"], 4);
        assert_eq!(manifest["methods"][0]["request"]["schema"], "RpcBlockRequest");
        assert_eq!(
            manifest["methods"][0]["request"]["type_name"]["strategy"],
            "exact-match"
        );
        assert_eq!(
            manifest["validation"]["block"]["responseValidatorName"],
            "RpcBlockResponseSchema"
        );
    }

    #[test]
    fn test_unavailable_oracle_is_reported() {
        let store = SchemaStore::from_document_str(DOC).unwrap();
        let config = GeneratorConfig {
            manifest_file: None,
            ..Default::default()
        };
        let output = Generator::new(config)
            .unwrap()
            .generate(&store, OracleState::Unavailable("build failed".into()))
            .unwrap();
        assert_eq!(output.artifacts.len(), 4);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.bindings[0].request.type_name.canonical_name,
            "RpcBlockRequest"
        );
    }

    #[test]
    fn test_write_artifacts() {
        let store = SchemaStore::from_document_str(DOC).unwrap();
        let output = Generator::new(GeneratorConfig::default())
            .unwrap()
            .generate(&store, OracleState::Absent)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("generated");
        let written = output.write_artifacts(&out_dir).unwrap();
        assert_eq!(written.len(), 5);
        let on_disk = std::fs::read_to_string(out_dir.join("types.ts")).unwrap();
        assert_eq!(Some(on_disk.as_str()), output.artifact("types.ts"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(matches!(Generator::new(config), Err(AppError::Config(_))));
    }
}
