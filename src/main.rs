//! chroma-check CLI entry point.

use std::process::ExitCode;

use chroma_check::cli::Cli;
use chroma_check::config::load_config;
use chroma_check::runner::{Checker, EXIT_CONFIG_ERROR, EXIT_FAILURE};
use chroma_check::shell::SystemRunner;
use chroma_check::ui::{create_reporter, OutputMode};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; the report owns stdout.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("chroma_check=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chroma_check=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("chroma-check starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            return exit_code(EXIT_CONFIG_ERROR);
        }
    };

    let config = match load_config(cli.config.as_deref(), &working_dir, cli.overlay()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(EXIT_CONFIG_ERROR);
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    let output_mode = if cli.json {
        OutputMode::Silent
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut reporter = create_reporter(output_mode);

    let runner = SystemRunner;
    let summary = Checker::new(&config, &runner).run(reporter.as_mut());

    if cli.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_code(EXIT_FAILURE);
            }
        }
    }

    exit_code(summary.exit_code)
}
