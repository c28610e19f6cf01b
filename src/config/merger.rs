//! Layer merging for configuration.
//!
//! Layers are applied lowest priority first: defaults, then the config
//! file, then the command line (which already folds in environment
//! variables). A `Some` in a later layer replaces the value; lists are
//! replaced entirely, never merged.

use super::schema::{CheckConfig, ConfigOverlay};

/// Apply a single overlay on top of `base`.
pub fn apply_overlay(base: &mut CheckConfig, overlay: ConfigOverlay) {
    let ConfigOverlay {
        python,
        module,
        server_command,
        host,
        port,
        data_dir,
        startup_wait_secs,
        request_timeout_secs,
        launcher_timeout_secs,
        module_timeout_secs,
        kill_grace_ms,
        launcher,
    } = overlay;

    if let Some(v) = python {
        base.python = v;
    }
    if let Some(v) = module {
        base.module = v;
    }
    if let Some(v) = server_command {
        base.server_command = v;
    }
    if let Some(v) = host {
        base.host = v;
    }
    if let Some(v) = port {
        base.port = v;
    }
    if let Some(v) = data_dir {
        base.data_dir = v;
    }
    if let Some(v) = startup_wait_secs {
        base.startup_wait_secs = v;
    }
    if let Some(v) = request_timeout_secs {
        base.request_timeout_secs = v;
    }
    if let Some(v) = launcher_timeout_secs {
        base.launcher_timeout_secs = v;
    }
    if let Some(v) = module_timeout_secs {
        base.module_timeout_secs = v;
    }
    if let Some(v) = kill_grace_ms {
        base.kill_grace_ms = v;
    }
    if launcher.is_some() {
        base.launcher = launcher;
    }
}

/// Merge overlays in order (later overrides earlier) on top of the defaults.
pub fn merge_layers<I>(layers: I) -> CheckConfig
where
    I: IntoIterator<Item = ConfigOverlay>,
{
    let mut config = CheckConfig::default();
    for layer in layers {
        apply_overlay(&mut config, layer);
    }
    config
}
