//! Error types for the live server.
//!
//! Startup failures (bad configuration, watcher setup, listener bind) surface
//! as [`CliError`] and end the process through a `miette` report. Failures
//! that happen while serving are handled where they occur: request errors
//! become HTTP statuses, send errors on a reload socket become
//! [`SendError`] values that the broadcaster logs and discards.
//!
//! # Example
//!
//! ```rust,no_run
//! use live_server::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_index(root: &Path) -> Result<String> {
//!     std::fs::read_to_string(root.join("index.html")).context("Failed to read index page")
//! }
//! ```

mod miette;

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub use self::miette::cli_error_to_miette;

/// Top-level error type returned by startup and command code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The directory to serve does not exist or is not a directory
    #[error("Directory not found: {}\n\nHint: Pass an existing directory with --watch-dir", .0.display())]
    DirectoryNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory enumeration failed while seeding the watcher
    #[error("Failed to list directories: {0}")]
    Walk(#[from] walkdir::Error),

    /// The native watcher could not be created
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// A directory could not be registered with the watcher
    #[error("Failed to watch {}: {source}", .path.display())]
    WatchPath {
        /// Directory that was being registered
        path: PathBuf,
        /// Underlying watcher error
        source: notify::Error,
    },

    /// The HTTP listener could not be bound
    #[error("Failed to bind to {addr}: {source}\n\nHint: Pick another port with --port")]
    Bind {
        /// Address the server tried to listen on
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("Server error: {0}")]
    Server(String),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {}\n\nHint: Create a live-server.json file or drop --config", .0.display())]
    NotFound(PathBuf),

    /// The merged configuration could not be deserialized
    #[error("Invalid configuration: {0}\n\nHint: Check live-server.json and LIVE_SERVER_* variables")]
    Invalid(String),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Failure to deliver a reload notice to one client.
#[derive(Debug, Error)]
pub enum SendError {
    /// The peer had already gone away; expected churn, not an error condition
    #[error("client already disconnected")]
    Disconnected,

    /// Any other transport failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl SendError {
    /// Whether this failure is ordinary disconnect churn.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SendError::Disconnected)
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_has_hint() {
        let err = CliError::DirectoryNotFound(PathBuf::from("site"));
        let msg = err.to_string();
        assert!(msg.contains("Directory not found: site"));
        assert!(msg.contains("--watch-dir"));
    }

    #[test]
    fn test_bind_error_mentions_addr() {
        let err = CliError::Bind {
            addr: "127.0.0.1:8080".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:8080"));
        assert!(msg.contains("--port"));
    }

    #[test]
    fn test_watch_path_error_mentions_path() {
        let err = CliError::WatchPath {
            path: PathBuf::from("/srv/site/css"),
            source: notify::Error::generic("boom"),
        };
        assert!(err.to_string().contains("/srv/site/css"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::Invalid("bad".to_string()).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: ":http".to_string(),
            hint: "Use a number between 0 and 65535".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port'"));
        assert!(msg.contains(":http"));
    }

    #[test]
    fn test_send_error_disconnect_classification() {
        assert!(SendError::Disconnected.is_disconnect());
        assert!(!SendError::Transport("reset".into()).is_disconnect());
    }

    #[test]
    fn test_result_ext_context_on_io() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.context("Failed to read index page").unwrap_err();
        assert!(matches!(err, CliError::Custom(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::Invalid("oops".to_string()));

        let err = result.context("Failed to load settings").unwrap_err();
        assert!(err.to_string().starts_with("Failed to load settings"));
    }
}
