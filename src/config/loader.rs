//! Configuration file discovery and loading.

use crate::config::merger::merge_layers;
use crate::config::schema::{CheckConfig, ConfigOverlay};
use crate::error::{CheckError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "chroma-check.yml";

/// Find the config file to load.
///
/// An explicit path must exist. Without one, `chroma-check.yml` in
/// `working_dir` is used if present; its absence is not an error.
pub fn discover_config_file(explicit: Option<&Path>, working_dir: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CheckError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        Ok(Some(candidate))
    } else {
        Ok(None)
    }
}

/// Load a single config file as an overlay.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_overlay_file(path: &Path) -> Result<ConfigOverlay> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CheckError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CheckError::Io(e)
        }
    })?;

    parse_overlay(&content, path)
}

/// Parse YAML content into an overlay.
///
/// An empty (or comment-only) document is an empty overlay.
pub fn parse_overlay(content: &str, source_path: &Path) -> Result<ConfigOverlay> {
    let has_content = content
        .lines()
        .map(str::trim)
        .any(|l| !l.is_empty() && !l.starts_with('#'));
    if !has_content {
        return Ok(ConfigOverlay::default());
    }

    serde_yaml::from_str(content).map_err(|e| CheckError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolve the configuration for a run.
///
/// Merges defaults, the discovered config file, and `cli` (flags and
/// environment variables), in that order.
pub fn load_config(
    explicit: Option<&Path>,
    working_dir: &Path,
    cli: ConfigOverlay,
) -> Result<CheckConfig> {
    let mut layers = Vec::with_capacity(2);

    if let Some(path) = discover_config_file(explicit, working_dir)? {
        tracing::debug!("Loading config from {}", path.display());
        layers.push(load_overlay_file(&path)?);
    }
    layers.push(cli);

    let config = merge_layers(layers);
    check_data_dir(&config.data_dir, working_dir)?;
    Ok(config)
}

/// Reject a scratch data directory that is `working_dir` or one of its
/// ancestors (including `/`).
///
/// A path that does not exist yet cannot contain the working directory, so
/// only existing paths are resolved.
pub fn check_data_dir(data_dir: &Path, working_dir: &Path) -> Result<()> {
    let candidate = working_dir.join(data_dir);
    if !candidate.exists() {
        return Ok(());
    }

    let resolved = fs::canonicalize(&candidate)?;
    let working = fs::canonicalize(working_dir)?;
    if working.starts_with(&resolved) {
        return Err(CheckError::UnsafeDataDir {
            path: data_dir.to_path_buf(),
        });
    }
    Ok(())
}
