//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration (or fall back to defaults) and apply CLI overrides
//! - Make the one-time template pick for `random-on-startup`
//! - Bind the listener last, so traffic only arrives once everything is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::path::Path;

use crate::config::{load_config, ConfigError, ErrorPagesConfig};
use crate::rotation::RotationMode;

/// Load the configuration at `path`, or the built-in defaults without one.
pub fn load_or_default(path: Option<&Path>) -> Result<ErrorPagesConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => Ok(ErrorPagesConfig::default()),
    }
}

/// For `random-on-startup`, replace the configured template name with a random
/// one from the set. Returns the picked name.
pub fn apply_startup_rotation(config: &mut ErrorPagesConfig) -> Option<String> {
    if config.rotation_mode != RotationMode::RandomOnStartup {
        return None;
    }

    let picked = config.templates.random_name()?.to_string();
    config.template_name = picked.clone();
    Some(picked)
}
