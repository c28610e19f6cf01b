//! The individual checks a run is made of.
//!
//! - [`module`]: can the interpreter import `chromadb`?
//! - [`launcher`]: can the alternate launcher (`py -3`) import it too?
//! - [`server`]: does `chroma run` start and answer its heartbeat?
//!
//! [`heartbeat`], [`process`] and [`scratch`] are the pieces the server
//! probe is built from.

pub mod heartbeat;
pub mod launcher;
pub mod module;
pub mod process;
pub mod scratch;
pub mod server;

pub use heartbeat::{HeartbeatClient, HeartbeatOutcome, HEARTBEAT_PATHS};
pub use launcher::{check_launcher, probe_launcher, LauncherStatus};
pub use module::{check_module, probe_module, ModuleStatus, UNKNOWN_VERSION};
pub use process::{describe_exit, ServerProcess, ShutdownOutcome};
pub use scratch::ScratchDir;
pub use server::{probe_server, server_command, ExitReport, ServerOutcome, ServerProbe};
