mod cli;

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use curl_runner::{
    config::Config,
    printer::{JsonPrinter, SummaryPrinter},
    runner::input::DecodeError,
    CurlRunner, ExecutionRequest, ExecutionResult, ExecutionStatus, RunError, Runner,
};
use is_terminal::IsTerminal;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // CLI flags override config
    let mut cfg = Config::load();
    if let Some(path) = &args.curl {
        cfg.set("CURL_BINARY", path.to_string_lossy());
    }
    if let Some(secs) = args.timeout {
        cfg.set("EXECUTION_TIMEOUT", secs.to_string());
    }

    init_tracing(&cfg);

    let stdin = io::stdin();
    let stdin_is_tty = stdin.is_terminal();
    let (id, result) = execute(&args, &cfg, stdin, stdin_is_tty).await;

    let mut stdout = io::stdout().lock();
    let color = io::stdout().is_terminal();
    write_report(&mut stdout, &args, color, &id, &result)?;
    drop(stdout);

    std::process::exit(exit_code(result.status()));
}

fn init_tracing(cfg: &Config) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_filter())),
        )
        .with(log_layer(io::stderr, io::stderr().is_terminal()))
        .init();
}

fn log_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
}

/// Read, decode and run one execution. Every failure becomes a result record.
///
/// Returns the execution id (empty when the document could not be read) and the result.
async fn execute(
    args: &cli::Cli,
    cfg: &Config,
    stdin: impl Read,
    stdin_is_tty: bool,
) -> (String, ExecutionResult) {
    let text = match read_execution(args, stdin, stdin_is_tty) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "no execution to run");
            return (
                String::new(),
                ExecutionResult::error(String::new(), format!("{err:#}")),
            );
        }
    };
    match ExecutionRequest::from_json(&text) {
        Ok(request) => {
            let result = run_with_deadline(cfg, &request).await;
            (request.id, result)
        }
        Err(err) => (
            String::new(),
            RunError::from(DecodeError::Document(err)).into_result(String::new()),
        ),
    }
}

fn read_execution(args: &cli::Cli, mut stdin: impl Read, stdin_is_tty: bool) -> Result<String> {
    if let Some(text) = &args.execution {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("reading execution file: {}", path.display()));
    }
    if stdin_is_tty {
        bail!("missing execution: pass it as an argument, with --file, or on stdin");
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf).context("reading execution from stdin")?;
    if buf.trim().is_empty() {
        bail!("missing execution: stdin was empty");
    }
    Ok(buf)
}

/// The deadline belongs to the host side; the runner itself never times out.
async fn run_with_deadline(cfg: &Config, request: &ExecutionRequest) -> ExecutionResult {
    let runner = CurlRunner::from_config(cfg);
    match cfg.execution_timeout() {
        Some(limit) => match tokio::time::timeout(limit, runner.run(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(execution_id = %request.id, "execution timed out");
                ExecutionResult::error(
                    String::new(),
                    format!("execution timed out after {}s", limit.as_secs()),
                )
            }
        },
        None => runner.run(request).await,
    }
}

/// Result line (JSON or summary), then the `$$$<id>$$$` marker the host scans for.
fn write_report(
    out: &mut impl Write,
    args: &cli::Cli,
    color: bool,
    id: &str,
    result: &ExecutionResult,
) -> Result<()> {
    if args.pretty {
        writeln!(out, "{}", SummaryPrinter { color }.render(result))?;
    } else {
        writeln!(out, "{}", JsonPrinter.render(result)?)?;
    }
    if !args.no_marker {
        write!(out, "$$${}$$$", id)?;
    }
    out.flush()?;
    Ok(())
}

fn exit_code(status: ExecutionStatus) -> i32 {
    match status {
        ExecutionStatus::Passed => 0,
        ExecutionStatus::Failed => 1,
        ExecutionStatus::Error => 2,
    }
}
