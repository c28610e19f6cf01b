//! Check run orchestration.

pub mod checker;
pub mod summary;

pub use checker::Checker;
pub use summary::{CheckSummary, EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SUCCESS};
