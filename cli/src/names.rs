#![deny(missing_docs)]

//! # Names Command
//!
//! Lists the type names an existing artifact declares, i.e. what the
//! generator would treat as known names when given that artifact.

use std::path::PathBuf;

use rpcgen_core::TypeNameOracle;

use crate::error::CliResult;

/// Arguments for the names command.
#[derive(clap::Args, Debug, Clone)]
pub struct NamesArgs {
    /// TypeScript file to scan.
    pub file: PathBuf,
}

/// Prints one declared name per line.
pub fn execute(args: &NamesArgs) -> CliResult<()> {
    for name in scan(args)? {
        println!("{}", name);
    }
    Ok(())
}

fn scan(args: &NamesArgs) -> CliResult<Vec<String>> {
    let oracle = TypeNameOracle::from_path(&args.file)?;
    Ok(oracle.names().map(String::from).collect())
}
