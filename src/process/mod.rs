//! Child process execution for resolved curl commands.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::runner::input::CURL_PROGRAM;

/// Include response headers, suppress the progress meter.
pub const CURL_FLAGS: &str = "-is";

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("refusing to run `{0}`: only curl is executed")]
    UnsupportedProgram(String),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    Exited {
        program: String,
        code: Option<i32>,
        stderr: String,
        stdout: String,
    },
}

impl ExecutionError {
    /// Standard output captured before the failure, if the process ran at all.
    pub fn captured_output(&self) -> &str {
        match self {
            Self::Exited { stdout, .. } => stdout,
            _ => "",
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Runs a resolved program and returns its standard output.
///
/// Implementations must not keep per-run state; one executor serves every run.
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<Vec<u8>, ExecutionError>> + Send;
}

/// Argument list as handed to curl: the fixed flags, then the caller's arguments.
pub fn curl_args(args: &[String]) -> Vec<String> {
    let mut full = Vec::with_capacity(args.len() + 1);
    full.push(CURL_FLAGS.to_string());
    full.extend(args.iter().cloned());
    full
}

/// Spawns curl as a child process using the configured binary.
///
/// Any program other than `curl` is rejected before spawning.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    curl_binary: PathBuf,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self {
            curl_binary: PathBuf::from(CURL_PROGRAM),
        }
    }
}

impl ProcessExecutor {
    pub fn new(curl_binary: impl Into<PathBuf>) -> Self {
        Self {
            curl_binary: curl_binary.into(),
        }
    }

    pub fn curl_binary(&self) -> &Path {
        &self.curl_binary
    }

    fn resolve(&self, program: &str) -> Result<&Path, ExecutionError> {
        if program == CURL_PROGRAM {
            Ok(&self.curl_binary)
        } else {
            Err(ExecutionError::UnsupportedProgram(program.to_string()))
        }
    }
}

impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<Vec<u8>, ExecutionError> {
        let binary = self.resolve(program)?;
        let full_args = curl_args(args);
        debug!(binary = %binary.display(), arg_count = full_args.len(), "spawning");

        let mut cmd = Command::new(binary);
        cmd.args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ExecutionError::Spawn {
            program: binary.display().to_string(),
            source,
        })?;
        let out = child
            .wait_with_output()
            .await
            .map_err(|source| ExecutionError::Wait {
                program: binary.display().to_string(),
                source,
            })?;

        if !out.status.success() {
            return Err(ExecutionError::Exited {
                program: binary.display().to_string(),
                code: out.status.code(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            });
        }
        debug!(bytes = out.stdout.len(), "process finished");
        Ok(out.stdout)
    }
}
