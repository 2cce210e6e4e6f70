//! Execution protocol: the request handed in by the host and the result handed back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One test run as delivered by the host platform.
///
/// `content` is the command specification payload. Hosts send it either as an
/// embedded JSON object or as JSON text (older hosts call the field
/// `scriptContent` or `metadata`); decoding happens later in the runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(default)]
    pub id: String,
    #[serde(
        default,
        alias = "script_content",
        alias = "scriptContent",
        alias = "metadata"
    )]
    pub content: Value,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl ExecutionRequest {
    pub fn new(id: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Parse a host execution document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The command ran and every expectation held.
    Passed,
    /// The command ran but an expectation did not hold.
    Failed,
    /// The command could not be run or its output could not be read.
    Error,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single run. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    status: ExecutionStatus,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl ExecutionResult {
    pub fn passed(output: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Passed,
            output: output.into(),
            error_message: None,
        }
    }

    pub fn failed(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            output: output.into(),
            error_message: Some(message.into()),
        }
    }

    pub fn error(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            output: output.into(),
            error_message: Some(message.into()),
        }
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_passed(&self) -> bool {
        self.status == ExecutionStatus::Passed
    }
}
