//! Status line extraction from `curl -i` output.

use std::sync::LazyLock;

use regex::Regex;

/// First token of the line (`HTTP/1.1`), whitespace, then the status digits.
static STATUS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S*\s+(\d+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no HTTP status code found in curl output")]
    StatusNotFound,
    #[error("HTTP status code `{0}` is out of range")]
    StatusOutOfRange(String),
}

/// Read the status code from the first line of the captured output.
///
/// Any digit run is accepted as-is; no check that it is a real HTTP status.
pub fn parse_status(raw: &str) -> Result<u64, ParseError> {
    let first_line = raw.lines().next().ok_or(ParseError::StatusNotFound)?;
    let digits = STATUS_LINE_RE
        .captures(first_line)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::StatusNotFound)?
        .as_str();
    digits
        .parse::<u64>()
        .map_err(|_| ParseError::StatusOutOfRange(digits.to_string()))
}
