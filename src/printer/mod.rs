//! Result printers: JSON for the host, colored summary for people.

use owo_colors::OwoColorize;

use crate::execution::{ExecutionResult, ExecutionStatus};

pub struct JsonPrinter;

impl JsonPrinter {
    pub fn render(&self, result: &ExecutionResult) -> serde_json::Result<String> {
        serde_json::to_string(result)
    }
}

pub struct SummaryPrinter {
    pub color: bool,
}

impl SummaryPrinter {
    pub fn render(&self, result: &ExecutionResult) -> String {
        let label = result.status().as_str().to_uppercase();
        let label = if self.color {
            match result.status() {
                ExecutionStatus::Passed => label.green().bold().to_string(),
                ExecutionStatus::Failed => label.red().bold().to_string(),
                ExecutionStatus::Error => label.yellow().bold().to_string(),
            }
        } else {
            label
        };

        let mut text = label;
        if let Some(msg) = result.error_message() {
            text.push_str(": ");
            text.push_str(msg);
        }
        if !result.output().is_empty() {
            text.push_str("\n\n");
            text.push_str(result.output().trim_end());
        }
        text
    }
}
