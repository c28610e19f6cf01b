//! Child process execution and platform capabilities.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{run_with_timeout, CommandResult, CommandRunner, CommandSpec, SystemRunner};
pub use mock::{MockResponse, MockRunner};
pub use platform::{is_ci, AlternateLauncher};
