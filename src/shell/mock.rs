//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything. It
//! answers each program with queued responses and records every command it
//! was asked to run.
//!
//! # Example
//!
//! ```
//! use chroma_check::shell::{CommandRunner, CommandSpec, MockRunner};
//! use std::time::Duration;
//!
//! let runner = MockRunner::new();
//! runner.respond_exit("python3", 0, "1.0.21\n", "");
//!
//! let spec = CommandSpec::new("python3").args(["-c", "import chromadb"]);
//! let result = runner.run(&spec, Duration::from_secs(1)).unwrap();
//!
//! assert!(result.success);
//! assert_eq!(runner.calls()[0].program, "python3");
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

use super::command::{CommandResult, CommandRunner, CommandSpec};
use crate::error::{CheckError, Result};

/// A canned response for one invocation.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The program ran and exited with `code`.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program could not be started.
    SpawnError(String),
    /// The program exceeded its timeout.
    Timeout,
}

/// Command runner that returns pre-configured responses.
///
/// Programs with no queued response fail to spawn, the same way a missing
/// executable does.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<HashMap<String, VecDeque<MockResponse>>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next invocation of `program`.
    pub fn respond(&self, program: &str, response: MockResponse) {
        self.responses
            .borrow_mut()
            .entry(program.to_string())
            .or_default()
            .push_back(response);
    }

    /// Queue an exit with the given code and output.
    pub fn respond_exit(&self, program: &str, code: i32, stdout: &str, stderr: &str) {
        self.respond(
            program,
            MockResponse::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());

        let response = self
            .responses
            .borrow_mut()
            .get_mut(&spec.program)
            .and_then(VecDeque::pop_front);

        match response {
            Some(MockResponse::Exit {
                code: 0,
                stdout,
                stderr,
            }) => Ok(CommandResult::success(stdout, stderr, Duration::ZERO)),
            Some(MockResponse::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(CommandResult::failure(
                Some(code),
                stdout,
                stderr,
                Duration::ZERO,
            )),
            Some(MockResponse::Timeout) => Err(CheckError::Timeout {
                command: spec.display(),
                timeout_secs: timeout.as_secs(),
            }),
            Some(MockResponse::SpawnError(message)) => Err(CheckError::SpawnFailed {
                command: spec.display(),
                source: io::Error::new(io::ErrorKind::NotFound, message),
            }),
            None => Err(CheckError::SpawnFailed {
                command: spec.display(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
        }
    }
}
