//! chroma-check - Smoke test for a ChromaDB installation.
//!
//! Checks that the `chromadb` Python module imports, that `chroma run`
//! starts a server answering its heartbeat, and (on Windows) that the `py`
//! launcher can import the module too. Everything the run creates, the
//! server process and its scratch data directory, is gone when it returns.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration loading
//! - [`error`] - Error types and result aliases
//! - [`probe`] - The module, launcher and server checks
//! - [`runner`] - Check orchestration and the run summary
//! - [`shell`] - Child process execution
//! - [`ui`] - Status lines, spinners and terminal output
//!
//! # Example
//!
//! ```
//! use chroma_check::config::CheckConfig;
//! use chroma_check::probe::server_command;
//!
//! let config = CheckConfig {
//!     server_command: "chroma".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(
//!     server_command(&config).display(),
//!     "chroma run --path test_chromadb_data --host 127.0.0.1 --port 8000"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod probe;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{CheckError, Result};
