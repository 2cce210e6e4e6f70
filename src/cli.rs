use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "curl-runner", about = "Run a curl test execution and report the result", version)]
#[command(group(ArgGroup::new("source").args(["execution", "file"]).multiple(false)))]
pub struct Cli {
    /// Execution document as JSON. Read from stdin when neither this nor --file is given.
    #[arg(value_name = "EXECUTION")]
    pub execution: Option<String>,

    /// Read the execution document from a file.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Path to the curl binary (overrides CURL_BINARY).
    #[arg(long)]
    pub curl: Option<PathBuf>,

    /// Deadline for the run in seconds, 0 for none (overrides EXECUTION_TIMEOUT).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Print a readable summary instead of JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Do not print the `$$$<id>$$$` completion marker.
    #[arg(long = "no-marker")]
    pub no_marker: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
