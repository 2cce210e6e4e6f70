//! Expectation checks on a completed curl run.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertionError {
    #[error("response status doesn't match: expected {expected}, got {actual}")]
    StatusMismatch { expected: u64, actual: u64 },
    #[error("response doesn't contain expected body: {expected}")]
    BodyMissing { expected: String },
}

/// Check status first, then body. The first unmet expectation is returned.
///
/// An empty `expected_body` skips the body check. The body check is a plain,
/// case-sensitive substring search over the whole raw output.
pub fn evaluate(
    actual_status: u64,
    expected_status: u64,
    raw_output: &str,
    expected_body: &str,
) -> Result<(), AssertionError> {
    if actual_status != expected_status {
        return Err(AssertionError::StatusMismatch {
            expected: expected_status,
            actual: actual_status,
        });
    }
    if !expected_body.is_empty() && !raw_output.contains(expected_body) {
        return Err(AssertionError::BodyMissing {
            expected: expected_body.to_string(),
        });
    }
    Ok(())
}
