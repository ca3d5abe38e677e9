#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads the API description, runs the full pipeline and writes the
//! artifacts.

use std::path::PathBuf;

use rpcgen_core::{GenerationOutput, Generator, GeneratorConfig, SchemaStore};

use crate::error::{CliError, CliResult};
use crate::oracle::{acquire_oracle, CommandExecutor, OracleSource};

/// Input and naming options shared by the commands that read a document.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to the API description (OpenAPI YAML or JSON).
    #[clap(short, long, env = "RPCGEN_INPUT", default_value = "openapi.json")]
    pub input: PathBuf,

    /// Generator config file (YAML or JSON).
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Existing type artifact to read known type names from.
    #[clap(long)]
    pub oracle: Option<PathBuf>,

    /// Build command producing the type artifact given by `--oracle-output`.
    #[clap(long, requires = "oracle_output")]
    pub oracle_command: Option<String>,

    /// Type artifact produced by `--oracle-command`.
    #[clap(long)]
    pub oracle_output: Option<PathBuf>,

    /// Do not use the emitted declarations as known type names.
    #[clap(long)]
    pub no_introspect: bool,

    /// Protocol prefix tried when resolving names.
    #[clap(long)]
    pub name_prefix: Option<String>,

    /// Nesting depth after which schemas render as unknown.
    #[clap(long)]
    pub max_depth: Option<usize>,
}

impl SourceArgs {
    /// The config file (or defaults) with command-line overrides applied.
    pub fn load_config(&self) -> CliResult<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_path(path)?,
            None => GeneratorConfig::default(),
        };
        if self.no_introspect {
            config.introspect_emitted = false;
        }
        if let Some(prefix) = &self.name_prefix {
            config.name_prefix = prefix.clone();
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        Ok(config)
    }

    /// Reads the API description.
    pub fn load_store(&self) -> CliResult<SchemaStore> {
        if !self.input.exists() {
            return Err(CliError::General(format!(
                "API description not found: {:?}",
                self.input
            )));
        }
        Ok(SchemaStore::from_path(&self.input)?)
    }

    /// The configured known-names source, if any.
    pub fn oracle_source(&self) -> CliResult<Option<OracleSource>> {
        OracleSource::from_flags(
            self.oracle.as_deref(),
            self.oracle_command.as_deref(),
            self.oracle_output.as_deref(),
        )
    }
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Directory receiving the generated files.
    #[clap(short, long, default_value = "generated")]
    pub out_dir: PathBuf,

    /// Skip the JSON manifest.
    #[clap(long)]
    pub no_manifest: bool,
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `executor` - Runs the optional type build step.
pub fn execute<E: CommandExecutor>(args: &GenerateArgs, executor: &E) -> CliResult<()> {
    let output = run(args, executor)?;

    for path in output.write_artifacts(&args.out_dir)? {
        println!("Generated {}", path.display());
    }
    report(&output);
    Ok(())
}

/// Runs the pipeline without writing anything.
pub fn run<E: CommandExecutor>(args: &GenerateArgs, executor: &E) -> CliResult<GenerationOutput> {
    let mut config = args.source.load_config()?;
    if args.no_manifest {
        config.manifest_file = None;
    }
    let generator = Generator::new(config)?;
    let store = args.source.load_store()?;
    tracing::info!(
        schemas = store.schemas().len(),
        operations = store.operations().len(),
        input = %args.source.input.display(),
        "loaded API description"
    );

    let oracle = acquire_oracle(args.source.oracle_source()?.as_ref(), executor);
    Ok(generator.generate(&store, oracle)?)
}

fn report(output: &GenerationOutput) {
    if output.diagnostics.is_empty() {
        return;
    }
    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    eprintln!("{}", output.diagnostics.summary());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ShellExecutor;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const DOC: &str = r##"{
  "openapi": "3.0.0",
  "paths": {
    "/status": {
      "post": {
        "operationId": "status",
        "requestBody": {"content": {"application/json": {"schema": {
          "type": "object",
          "properties": {"params": {"$ref": "#/components/schemas/RpcStatusRequest"}}
        }}}}
      }
    }
  },
  "components": {
    "schemas": {
      "RpcStatusRequest": {"type": "object", "properties": {"verbose": {"type": "boolean"}}}
    }
  }
}"##;

    fn args(dir: &Path) -> GenerateArgs {
        GenerateArgs {
            source: SourceArgs {
                input: dir.join("openapi.json"),
                config: None,
                oracle: None,
                oracle_command: None,
                oracle_output: None,
                no_introspect: false,
                name_prefix: None,
                max_depth: None,
            },
            out_dir: dir.join("out"),
            no_manifest: false,
        }
    }

    #[test]
    fn test_generate_writes_artifacts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.json"), DOC).unwrap();
        let args = args(dir.path());

        execute(&args, &ShellExecutor).unwrap();

        let types = fs::read_to_string(args.out_dir.join("types.ts")).unwrap();
        assert!(types.contains("export type RpcStatusRequest = {"));
        assert!(types.contains("export type StatusRequest = RpcStatusRequest;"));
        assert!(args.out_dir.join("manifest.json").exists());
        let methods = fs::read_to_string(args.out_dir.join("methods.ts")).unwrap();
        assert!(methods.contains("status(params: types.RpcStatusRequest)"));
    }

    #[test]
    fn test_config_overrides() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.json"), DOC).unwrap();
        let config_path = dir.path().join("rpcgen.yaml");
        fs::write(&config_path, "types_file: api-types.ts\nmax_depth: 3\n").unwrap();

        let mut args = args(dir.path());
        args.source.config = Some(config_path);
        args.source.max_depth = Some(5);
        args.source.no_introspect = true;
        args.no_manifest = true;

        let config = args.source.load_config().unwrap();
        assert_eq!(config.max_depth, 5);
        assert!(!config.introspect_emitted);

        let output = run(&args, &ShellExecutor).unwrap();
        assert!(output.artifact("api-types.ts").is_some());
        assert!(output.artifact("manifest.json").is_none());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let result = run(&args(dir.path()), &ShellExecutor);
        assert!(matches!(result, Err(CliError::General(_))));
    }

    #[test]
    fn test_unreadable_oracle_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.json"), DOC).unwrap();
        let mut args = args(dir.path());
        args.source.oracle = Some(dir.path().join("missing.d.ts"));

        let output = run(&args, &ShellExecutor).unwrap();
        assert_eq!(output.diagnostics.len(), 2);
        assert_eq!(output.diagnostics.unwrap_failures(), 1);
    }
}
