//! The curl pipeline: decode, validate, template, execute, parse, evaluate.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    execution::{ExecutionRequest, ExecutionResult, ExecutionStatus},
    process::{CommandExecutor, ExecutionError, ProcessExecutor},
};

pub mod evaluate;
pub mod input;
pub mod response;
pub mod template;

use evaluate::AssertionError;
use input::{CommandSpec, DecodeError, ValidationError};
use response::ParseError;
use template::TemplateError;

/// Anything that turns one execution request into one result.
pub trait Runner: Send + Sync {
    fn run(&self, request: &ExecutionRequest) -> impl Future<Output = ExecutionResult> + Send;
}

/// First failure of a run. Only assertion failures mean the test itself failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

impl RunError {
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::Assertion(_) => ExecutionStatus::Failed,
            _ => ExecutionStatus::Error,
        }
    }

    pub fn into_result(self, output: String) -> ExecutionResult {
        let message = self.to_string();
        match self.status() {
            ExecutionStatus::Failed => ExecutionResult::failed(output, message),
            _ => ExecutionResult::error(output, message),
        }
    }
}

/// Runs curl commands and checks the response against expectations.
///
/// Holds only the executor; every run works on request-local data, so one
/// instance can serve concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct CurlRunner<E = ProcessExecutor> {
    executor: E,
}

impl CurlRunner<ProcessExecutor> {
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(ProcessExecutor::new(cfg.curl_binary()))
    }
}

impl<E: CommandExecutor> CurlRunner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Decode and validate the payload, then fill in variables.
    ///
    /// Returns the decoded command and its resolved tokens (program first).
    pub fn prepare(
        &self,
        request: &ExecutionRequest,
    ) -> Result<(CommandSpec, Vec<String>), RunError> {
        let spec = CommandSpec::decode(&request.content)?;
        spec.validate()?;
        let resolved = template::fill_command_templates(&spec.command, &request.params)?;
        debug!(tokens = resolved.len(), "command resolved");
        Ok((spec, resolved))
    }
}

/// Parse the status line and compare the output against the expectations.
pub fn check_output(spec: &CommandSpec, output: &str) -> Result<(), RunError> {
    let status = response::parse_status(output)?;
    debug!(status, expected = spec.expected_status, "status parsed");
    evaluate::evaluate(status, spec.expected_status, output, &spec.expected_body)?;
    Ok(())
}

impl<E: CommandExecutor> Runner for CurlRunner<E> {
    #[tracing::instrument(name = "curl_run", skip_all, fields(execution_id = %request.id))]
    async fn run(&self, request: &ExecutionRequest) -> ExecutionResult {
        let (spec, resolved) = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(err) => return report(err, String::new()),
        };

        let (program, args) = match resolved.split_first() {
            Some(split) => split,
            None => return report(ValidationError::EmptyCommand.into(), String::new()),
        };
        let output = match self.executor.execute(program, args).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                let captured = err.captured_output().to_string();
                return report(err.into(), captured);
            }
        };

        match check_output(&spec, &output) {
            Ok(()) => {
                info!(status = %ExecutionStatus::Passed, "execution finished");
                ExecutionResult::passed(output)
            }
            Err(err) => report(err, output),
        }
    }
}

fn report(err: RunError, output: String) -> ExecutionResult {
    let result = err.into_result(output);
    if result.status() == ExecutionStatus::Failed {
        info!(status = %result.status(), error = result.error_message(), "execution finished");
    } else {
        warn!(status = %result.status(), error = result.error_message(), "execution errored");
    }
    result
}
