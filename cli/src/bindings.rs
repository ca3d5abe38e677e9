#![deny(missing_docs)]

//! # Bindings Command
//!
//! Prints how each operation was bound, as JSON, without writing artifacts.
//! Useful for checking which names an external type source changes.

use rpcgen_core::{BoundMethod, Diagnostics, Generator};
use serde::Serialize;

use crate::error::{CliError, CliResult};
use crate::generate::SourceArgs;
use crate::oracle::{acquire_oracle, CommandExecutor};

/// Arguments for the bindings command.
#[derive(clap::Args, Debug, Clone)]
pub struct BindingsArgs {
    #[clap(flatten)]
    pub source: SourceArgs,
}

#[derive(Serialize)]
struct Report<'a> {
    methods: &'a [BoundMethod],
    diagnostics: &'a Diagnostics,
}

/// Executes the binding report.
pub fn execute<E: CommandExecutor>(args: &BindingsArgs, executor: &E) -> CliResult<()> {
    println!("{}", render(args, executor)?);
    Ok(())
}

fn render<E: CommandExecutor>(args: &BindingsArgs, executor: &E) -> CliResult<String> {
    let generator = Generator::new(args.source.load_config()?)?;
    let store = args.source.load_store()?;
    let oracle = acquire_oracle(args.source.oracle_source()?.as_ref(), executor);
    let (methods, diagnostics) = generator.bind(&store, oracle)?;

    serde_json::to_string_pretty(&Report {
        methods: &methods,
        diagnostics: &diagnostics,
    })
    .map_err(|e| CliError::General(format!("Failed to serialize bindings: {}", e)))
}
