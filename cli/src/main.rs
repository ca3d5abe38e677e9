#![deny(missing_docs)]

//! # rpcgen CLI
//!
//! Command Line Interface for the JSON-RPC client generator.
//!
//! Supported Commands:
//! - `generate`: API description -> types, validators, validation table, method interface.
//! - `bindings`: Prints the operation bindings as JSON.
//! - `names`: Lists the type names declared by an existing artifact.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliResult;
use crate::oracle::ShellExecutor;

mod bindings;
mod error;
mod generate;
mod names;
mod oracle;

#[derive(Parser, Debug)]
#[clap(author, version, about = "JSON-RPC TypeScript client generator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the TypeScript artifacts.
    Generate(generate::GenerateArgs),
    /// Print how each operation binds to schemas and names.
    Bindings(bindings::BindingsArgs),
    /// List the declared names of a TypeScript file.
    Names(names::NamesArgs),
}

/// Log filter for a verbosity level; `RUST_LOG` takes precedence.
fn log_filter(verbose: u8) -> String {
    match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "error".to_string(),
            1 => "warn,rpcgen_core=info,rpcgen=info".to_string(),
            2 => "info,rpcgen_core=debug,rpcgen=debug".to_string(),
            _ => "debug,rpcgen_core=trace,rpcgen=trace".to_string(),
        },
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_new(log_filter(verbose)).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Generate(args) => generate::execute(args, &ShellExecutor),
        Commands::Bindings(args) => bindings::execute(args, &ShellExecutor),
        Commands::Names(args) => names::execute(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "rpcgen",
            "-vv",
            "generate",
            "--input",
            "api.yaml",
            "--oracle-command",
            "tsc -p .",
            "--oracle-output",
            "dist/types.d.ts",
            "--max-depth",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.source.input.to_str(), Some("api.yaml"));
                assert_eq!(args.source.max_depth, Some(4));
                assert_eq!(args.source.oracle_command.as_deref(), Some("tsc -p ."));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_oracle_command_requires_output() {
        let result = Cli::try_parse_from(["rpcgen", "generate", "--oracle-command", "tsc"]);
        assert!(result.is_err());
    }
}
