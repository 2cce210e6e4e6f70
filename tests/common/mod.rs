#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use curl_runner::process::{CommandExecutor, ExecutionError};

/// What the stub process does when run.
pub enum Reply {
    Output(String),
    Exit { code: i32, stdout: String },
}

/// Records invocations instead of spawning anything.
pub struct StubExecutor {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubExecutor {
    pub fn replying(output: &str) -> Self {
        Self::new(Reply::Output(output.to_string()))
    }

    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, Vec<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl CommandExecutor for StubExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<Vec<u8>, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        match &self.reply {
            Reply::Output(text) => Ok(text.clone().into_bytes()),
            Reply::Exit { code, stdout } => Err(ExecutionError::Exited {
                program: program.to_string(),
                code: Some(*code),
                stderr: "stub failure".to_string(),
                stdout: stdout.clone(),
            }),
        }
    }
}
