//! Command-line interface for chroma-check.
//!
//! - [`args`] - Argument definitions using clap's derive macros

pub mod args;

pub use args::Cli;
