use pretty_assertions::assert_eq;
use rpcgen_core::{
    AppError, Emitter, GeneratorConfig, Generator, NameResolver, OracleState, SchemaStore,
    TypeNameOracle, TypeScriptRenderer, ZodRenderer,
};
use std::collections::BTreeSet;
use std::fs;

const API: &str = r##"
openapi: 3.0.0
info:
  title: JSON-RPC API
  version: 1.0.0
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
                $ref: '#/components/schemas/JsonRpcResponse_for_RpcBlockResponse_and_RpcError'
  /EXPERIMENTAL_changes:
    post:
      operationId: EXPERIMENTAL_changes
      deprecated: true
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/JsonRpcRequest_for_EXPERIMENTAL_changes'
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/JsonRpcResponse_for_RpcStateChangesResponse_and_RpcError'
  /gas_price:
    post:
      operationId: gas_price
      responses:
        '200':
          content:
            application/json:
              schema:
                type: object
                properties:
                  id:
                    type: string
components:
  schemas:
    JsonRpcRequest_for_block:
      type: object
      required: [jsonrpc, id, method, params]
      properties:
        jsonrpc:
          type: string
        id:
          type: string
        method:
          type: string
          enum: [block]
        params:
          $ref: '#/components/schemas/RpcBlockRequest'
    JsonRpcRequest_for_EXPERIMENTAL_changes:
      type: object
      properties:
        params:
          $ref: '#/components/schemas/RpcStateChangesRequest'
    JsonRpcResponse_for_RpcBlockResponse_and_RpcError:
      oneOf:
        - type: object
          required: [result]
          properties:
            result:
              $ref: '#/components/schemas/RpcBlockResponse'
        - type: object
          required: [error]
          properties:
            error:
              $ref: '#/components/schemas/RpcError'
      properties:
        id:
          type: string
        jsonrpc:
          type: string
    JsonRpcResponse_for_RpcStateChangesResponse_and_RpcError:
      oneOf:
        - type: object
          properties:
            result:
              $ref: '#/components/schemas/RpcStateChangesResponse'
        - type: object
          properties:
            error:
              $ref: '#/components/schemas/RpcError'
    RpcBlockRequest:
      oneOf:
        - type: object
          properties:
            block_id:
              $ref: '#/components/schemas/BlockId'
        - type: object
          properties:
            finality:
              $ref: '#/components/schemas/Finality'
    RpcBlockResponse:
      type: object
      required: [author, header]
      properties:
        author:
          type: string
        header:
          $ref: '#/components/schemas/BlockHeaderView'
        chunks:
          type: array
          items:
            $ref: '#/components/schemas/ChunkHeaderView'
    RpcStateChangesRequest:
      type: object
      properties:
        account_ids:
          type: array
          items:
            type: string
    RpcStateChangesResponse:
      type: object
      properties:
        changes:
          type: array
          items:
            type: object
            additionalProperties: true
    BlockHeaderView:
      type: object
      properties:
        height:
          type: integer
        prev_hash:
          type: string
          nullable: true
        last_chunk:
          $ref: '#/components/schemas/ChunkHeaderView'
    ChunkHeaderView:
      type: object
      properties:
        chunk_hash:
          type: string
        block:
          $ref: '#/components/schemas/BlockHeaderView'
    BlockId:
      anyOf:
        - type: integer
        - type: string
    Finality:
      type: string
      enum: [optimistic, near-final, final]
    RpcError:
      type: object
      additionalProperties: false
      required: [code, message]
      properties:
        code:
          type: integer
        message:
          type: string
        data: {}
"##;

fn generate() -> rpcgen_core::GenerationOutput {
    let store = SchemaStore::from_document_str(API).unwrap();
    Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&store, OracleState::Absent)
        .unwrap()
}

#[test]
fn test_identical_input_yields_identical_output() {
    let first = generate();
    let second = generate();
    assert_eq!(first.artifacts, second.artifacts);
}

#[test]
fn test_type_and_validator_references_agree() {
    let store = SchemaStore::from_document_str(API).unwrap();
    let resolver = NameResolver::default();
    let types = Emitter::new(TypeScriptRenderer::new(&resolver), 10);
    let validators = Emitter::new(ZodRenderer::new(&resolver), 10);

    for (name, node) in store.schemas() {
        let (_, type_refs) = types.emit_with_references(node);
        let (_, validator_refs) = validators.emit_with_references(node);
        assert_eq!(type_refs, validator_refs, "references of {}", name);
    }
}

#[test]
fn test_mutually_recursive_schemas_are_lazy() {
    let output = generate();
    let schemas = output.artifact("schemas.ts").unwrap();
    assert!(!schemas.contains("last_chunk"));
    assert!(schemas.contains("lastChunk: z.lazy(() => ChunkHeaderViewSchema()).optional(),"));
    assert!(schemas.contains("block: z.lazy(() => BlockHeaderViewSchema()).optional(),"));
    assert!(schemas.contains("export const BlockHeaderViewSchema = () => z.object({"));
}

#[test]
fn test_success_branch_is_bound_not_the_union() {
    let output = generate();
    let block = &output.bindings[0];
    assert_eq!(block.response.type_name.canonical_name, "RpcBlockResponse");
    assert_eq!(block.request.type_name.canonical_name, "RpcBlockRequest");

    let methods = output.artifact("methods.ts").unwrap();
    assert!(methods
        .contains("  block(params: types.RpcBlockRequest): Promise<types.RpcBlockResponse>;"));
    assert!(methods.contains(
        "  experimentalChanges(params: types.RpcStateChangesRequest): Promise<types.RpcStateChangesResponse>;"
    ));
    assert!(!methods.contains("RpcError"));
}

#[test]
fn test_missing_request_falls_back_to_method_name() {
    let output = generate();
    let gas = &output.bindings[2];
    assert_eq!(gas.request.type_name.canonical_name, "GasPriceRequest");
    assert_eq!(gas.response.type_name.canonical_name, "GasPriceResponse");
    assert_eq!(output.diagnostics.unwrap_failures(), 2);

    let types = output.artifact("types.ts").unwrap();
    assert!(types.contains("export type GasPriceRequest = unknown;"));
}

#[test]
fn test_validation_map_keys_are_exactly_the_methods() {
    let output = generate();
    let keys: Vec<&str> = output.validation_map.method_names().collect();
    assert_eq!(keys, vec!["block", "EXPERIMENTAL_changes", "gas_price"]);

    let validation = output.artifact("validation.ts").unwrap();
    assert!(validation.contains("  gas_price: {},\n"));
    assert!(validation.contains("    requestSchema: schemas.RpcBlockRequestSchema,\n"));
}

#[test]
fn test_every_referenced_name_is_declared() {
    let output = generate();
    let types = TypeNameOracle::scan(output.artifact("types.ts").unwrap());
    let schemas = TypeNameOracle::scan(output.artifact("schemas.ts").unwrap());

    for method in &output.bindings {
        assert!(types.contains(&method.request.type_name.canonical_name));
        assert!(types.contains(&method.response.type_name.canonical_name));
        for validator in [&method.request.validator_name, &method.response.validator_name]
            .into_iter()
            .flatten()
        {
            assert!(schemas.contains(&validator.canonical_name));
        }
    }

    let type_names: BTreeSet<&str> = types.names().collect();
    let validator_names: BTreeSet<String> = schemas
        .names()
        .filter_map(|n| n.strip_suffix("Schema"))
        .map(String::from)
        .collect();
    for name in &type_names {
        assert!(validator_names.contains(*name), "no validator for {}", name);
    }
}

#[test]
fn test_external_type_names_are_preferred() {
    let store = SchemaStore::from_document_str(API).unwrap();
    let oracle = TypeNameOracle::from_names(["BlockResponse", "RpcBlockRequest"]);
    let output = Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&store, OracleState::Available(oracle))
        .unwrap();

    let block = &output.bindings[0];
    assert_eq!(block.response.type_name.canonical_name, "BlockResponse");
    assert_eq!(block.request.type_name.canonical_name, "RpcBlockRequest");
    let types = output.artifact("types.ts").unwrap();
    assert!(types.contains("export type BlockResponse = RpcBlockResponse;"));
}

#[test]
fn test_dangling_reference_aborts_with_path() {
    let doc = API.replace(
        "$ref: '#/components/schemas/BlockId'",
        "$ref: '#/components/schemas/MissingId'",
    );
    match SchemaStore::from_document_str(&doc) {
        Err(AppError::SchemaResolution { reference, path }) => {
            assert_eq!(reference, "#/components/schemas/MissingId");
            assert_eq!(
                path,
                "#/components/schemas/RpcBlockRequest/oneOf/0/properties/block_id"
            );
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_colliding_schema_names_abort() {
    let doc = r#"
components:
  schemas:
    block_id:
      type: string
    BlockId:
      type: integer
"#;
    let store = SchemaStore::from_document_str(doc).unwrap();
    match Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&store, OracleState::Absent)
    {
        Err(AppError::NameCollision {
            canonical,
            first,
            second,
            ..
        }) => {
            assert_eq!(canonical, "BlockId");
            assert_eq!(first, "block_id");
            assert_eq!(second, "BlockId");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_artifacts_written_to_disk() {
    let output = generate();
    let dir = tempfile::tempdir().unwrap();
    output.write_artifacts(dir.path()).unwrap();
    for file in ["types.ts", "schemas.ts", "validation.ts", "methods.ts", "manifest.json"] {
        let contents = fs::read_to_string(dir.path().join(file)).unwrap();
        assert_eq!(Some(contents.as_str()), output.artifact(file));
    }
}
