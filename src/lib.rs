//! Curl execution plugin: runs templated curl commands for a test platform and
//! checks the response status and body against expectations.

pub mod config;
pub mod execution;
pub mod printer;
pub mod process;
pub mod runner;

pub use execution::{ExecutionRequest, ExecutionResult, ExecutionStatus};
pub use runner::{CurlRunner, RunError, Runner};
