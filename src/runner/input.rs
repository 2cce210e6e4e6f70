//! Decoding and validation of the curl command specification.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The only program this runner will execute.
pub const CURL_PROGRAM: &str = "curl";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    /// Program name followed by its arguments.
    pub command: Vec<String>,
    #[serde(deserialize_with = "status_from_int_or_text")]
    pub expected_status: u64,
    /// Substring the response must contain; empty skips the body check.
    #[serde(default)]
    pub expected_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid execution document: {0}")]
    Document(#[source] serde_json::Error),
    #[error("execution has no command specification")]
    MissingContent,
    #[error("invalid command specification: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("command is empty")]
    EmptyCommand,
    #[error("only curl commands can be run, got `{0}`")]
    NotCurl(String),
}

impl CommandSpec {
    /// Decode the payload carried by an execution request.
    ///
    /// A string payload is treated as JSON text, an object is read directly.
    pub fn decode(content: &Value) -> Result<Self, DecodeError> {
        match content {
            Value::Null => Err(DecodeError::MissingContent),
            Value::String(text) if text.trim().is_empty() => Err(DecodeError::MissingContent),
            Value::String(text) => Ok(serde_json::from_str(text)?),
            other => Ok(Self::deserialize(other)?),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.command.first() {
            None => Err(ValidationError::EmptyCommand),
            Some(program) if program != CURL_PROGRAM => {
                Err(ValidationError::NotCurl(program.clone()))
            }
            Some(_) => Ok(()),
        }
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Int(u64),
    Text(String),
}

fn status_from_int_or_text<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StatusRepr::deserialize(deserializer)? {
        StatusRepr::Int(n) => Ok(n),
        StatusRepr::Text(s) => s.trim().parse::<u64>().map_err(|_| {
            serde::de::Error::custom(format!("expected_status `{s}` is not a status code"))
        }),
    }
}
