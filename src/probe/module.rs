//! Python module probe.
//!
//! Rust cannot import a Python module in-process, so the probe asks the
//! configured interpreter to do it and print the module's `__version__`.

use serde::Serialize;

use crate::config::CheckConfig;
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::Reporter;

/// Version reported when the module does not expose `__version__`.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Whether the module could be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Import succeeded.
    Found { version: String },
    /// Import failed, or the interpreter could not be run.
    Missing { reason: String },
}

impl ModuleStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, ModuleStatus::Found { .. })
    }
}

/// Whether `name` is a dotted Python identifier (`chromadb`, `chromadb.api`).
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        })
}

/// Inline Python that imports `module` and prints its version.
pub fn import_snippet(module: &str) -> String {
    format!(
        "import {module}; print(getattr({module}, '__version__', '{unknown}'))",
        unknown = UNKNOWN_VERSION
    )
}

/// The interpreter invocation used by the probe.
pub fn import_command(python: &str, module: &str) -> CommandSpec {
    CommandSpec::new(python).args(["-c".to_string(), import_snippet(module)])
}

/// Try to import the configured module.
pub fn check_module(runner: &dyn CommandRunner, config: &CheckConfig) -> ModuleStatus {
    if !is_valid_module_name(&config.module) {
        return ModuleStatus::Missing {
            reason: format!("'{}' is not a valid module name", config.module),
        };
    }

    let spec = import_command(&config.python, &config.module);
    match runner.run(&spec, config.module_timeout()) {
        Ok(result) if result.success => ModuleStatus::Found {
            version: result
                .last_stdout_line()
                .unwrap_or(UNKNOWN_VERSION)
                .to_string(),
        },
        Ok(result) => ModuleStatus::Missing {
            reason: result
                .last_stderr_line()
                .map(str::to_string)
                .unwrap_or_else(|| match result.exit_code {
                    Some(code) => format!("{} exited with code {}", config.python, code),
                    None => format!("{} was terminated by a signal", config.python),
                }),
        },
        Err(e) => ModuleStatus::Missing {
            reason: e.to_string(),
        },
    }
}

/// Run the module probe and report the result.
pub fn probe_module(
    runner: &dyn CommandRunner,
    config: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> ModuleStatus {
    reporter.message("Testing ChromaDB module import...");

    let status = check_module(runner, config);
    match &status {
        ModuleStatus::Found { version } => {
            reporter.ok(&format!("ChromaDB module found: version {}", version));
        }
        ModuleStatus::Missing { reason } => {
            reporter.fail(&format!("ChromaDB module not found: {}", reason));
        }
    }
    status
}
