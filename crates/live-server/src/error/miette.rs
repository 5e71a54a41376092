//! Miette diagnostic conversion for CLI errors.
//!
//! Startup errors are rendered as miette reports by `main`, which gives the
//! process a non-zero exit status.

use crate::error::{CliError, ConfigError};
use ::miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::WatchPath { path, source } => ::miette::miette!(
            "Failed to watch {}: {}\n\nHint: Check that the directory is readable and that the \
             system watch limit (fs.inotify.max_user_watches on Linux) is large enough",
            path.display(),
            source
        ),
        _ => ::miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::InvalidValue { field, value, hint } => ::miette::miette!(
            "Invalid value for '{}': {}\n\nHint: {}",
            field,
            value,
            hint
        ),
        _ => ::miette::miette!("Configuration error: {}", err),
    }
}
