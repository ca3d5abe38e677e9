#![deny(missing_docs)]

//! # Type Name Sources
//!
//! Acquires the optional set of already-declared type names, either from an
//! existing type artifact or by running an external build step that produces
//! one.
//!
//! Failures never abort a run: they yield [`OracleState::Unavailable`] and the
//! generator falls back to heuristic naming.

use crate::error::{CliError, CliResult};
use rpcgen_core::{OracleState, TypeNameOracle};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Interface for executing the external build step.
///
/// Abstracted to allow mocking command execution in tests.
pub trait CommandExecutor {
    /// Executes the command and returns the output.
    fn execute(&self, program: &str, args: &[&str]) -> CliResult<Output>;
}

/// Standard executor using `std::process::Command`.
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> CliResult<Output> {
        let output = Command::new(program).args(args).output()?;
        Ok(output)
    }
}

/// Where known type names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleSource {
    /// Scan an existing type artifact.
    File(PathBuf),
    /// Run `command` (whitespace-separated, no shell), then scan `output`.
    Command {
        /// The build command line.
        command: String,
        /// The type artifact the command produces.
        output: PathBuf,
    },
}

impl OracleSource {
    /// Builds a source from the CLI flags; `--oracle` wins over `--oracle-command`.
    pub fn from_flags(
        file: Option<&Path>,
        command: Option<&str>,
        output: Option<&Path>,
    ) -> CliResult<Option<Self>> {
        match (file, command, output) {
            (Some(file), _, _) => Ok(Some(Self::File(file.to_path_buf()))),
            (None, Some(command), Some(output)) => Ok(Some(Self::Command {
                command: command.to_string(),
                output: output.to_path_buf(),
            })),
            (None, Some(_), None) => Err(CliError::General(
                "--oracle-command requires --oracle-output".into(),
            )),
            (None, None, _) => Ok(None),
        }
    }
}

/// Obtains the known-names set from `source`.
pub fn acquire_oracle<E: CommandExecutor>(source: Option<&OracleSource>, executor: &E) -> OracleState {
    let Some(source) = source else {
        return OracleState::Absent;
    };

    let result = match source {
        OracleSource::File(path) => scan_file(path),
        OracleSource::Command { command, output } => {
            run_build(command, executor).and_then(|()| scan_file(output))
        }
    };

    match result {
        Ok(oracle) => {
            tracing::info!(names = oracle.len(), "loaded known type names");
            OracleState::Available(oracle)
        }
        Err(e) => OracleState::Unavailable(e.to_string()),
    }
}

fn run_build<E: CommandExecutor>(command: &str, executor: &E) -> CliResult<()> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::General("empty --oracle-command".into()))?;
    let args: Vec<&str> = parts.collect();

    tracing::info!(%command, "running type build step");
    let output = executor.execute(program, &args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::General(format!(
            "{} failed with status {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

fn scan_file(path: &Path) -> CliResult<TypeNameOracle> {
    Ok(TypeNameOracle::from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    // Mock Executor to capture commands; optionally writes the artifact.
    struct MockExecutor {
        last_command: RefCell<Option<(String, Vec<String>)>>,
        should_fail: bool,
        writes: Option<(PathBuf, &'static str)>,
    }

    impl MockExecutor {
        fn new(should_fail: bool, writes: Option<(PathBuf, &'static str)>) -> Self {
            Self {
                last_command: RefCell::new(None),
                should_fail,
                writes,
            }
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(&self, program: &str, args: &[&str]) -> CliResult<Output> {
            self.last_command.borrow_mut().replace((
                program.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ));
            if let Some((path, contents)) = &self.writes {
                std::fs::write(path, contents)?;
            }

            let status = if self.should_fail {
                ExitStatus::from_raw(1 << 8)
            } else {
                ExitStatus::from_raw(0)
            };

            Ok(Output {
                status,
                stdout: Vec::new(),
                stderr: if self.should_fail {
                    b"Mock Error".to_vec()
                } else {
                    Vec::new()
                },
            })
        }
    }

    #[test]
    fn test_absent_without_source() {
        let executor = MockExecutor::new(false, None);
        assert!(matches!(acquire_oracle(None, &executor), OracleState::Absent));
        assert!(executor.last_command.take().is_none());
    }

    #[test]
    fn test_build_step_then_scan() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("types.d.ts");
        let executor = MockExecutor::new(
            false,
            Some((artifact.clone(), "export type BlockRequest = {};\n")),
        );
        let source = OracleSource::Command {
            command: "tsc -p tsconfig.json".into(),
            output: artifact,
        };

        match acquire_oracle(Some(&source), &executor) {
            OracleState::Available(oracle) => assert!(oracle.contains("BlockRequest")),
            other => panic!("unexpected state: {:?}", other),
        }
        let (program, args) = executor.last_command.take().unwrap();
        assert_eq!(program, "tsc");
        assert_eq!(args, vec!["-p", "tsconfig.json"]);
    }

    #[test]
    fn test_failed_build_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new(true, None);
        let source = OracleSource::Command {
            command: "tsc".into(),
            output: dir.path().join("types.d.ts"),
        };
        match acquire_oracle(Some(&source), &executor) {
            OracleState::Unavailable(reason) => {
                assert!(reason.contains("tsc failed"));
                assert!(reason.contains("Mock Error"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let executor = MockExecutor::new(false, None);
        let source = OracleSource::File(PathBuf::from("/nonexistent/types.ts"));
        assert!(matches!(
            acquire_oracle(Some(&source), &executor),
            OracleState::Unavailable(_)
        ));
    }

    #[test]
    fn test_source_from_flags() {
        let file = PathBuf::from("types.ts");
        assert_eq!(
            OracleSource::from_flags(Some(file.as_path()), Some("tsc"), None).unwrap(),
            Some(OracleSource::File(file))
        );
        assert!(OracleSource::from_flags(None, Some("tsc"), None).is_err());
        assert_eq!(OracleSource::from_flags(None, None, None).unwrap(), None);
    }

    #[test]
    fn test_shell_executor_structure() {
        // Either outcome proves the trait impl was called.
        let exec = ShellExecutor;
        if let Ok(output) = exec.execute("echo", &["test"]) {
            assert!(output.status.success());
        }
    }
}
