use crate::config::ServerConfig;
use crate::error::{CliError, ConfigError, Result};
use std::net::SocketAddr;
use std::path::{Component, Path};
use std::time::Duration;

impl ServerConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.watch_dir.is_dir() {
            return Err(CliError::DirectoryNotFound(self.watch_dir.clone()));
        }

        self.port_number()?;

        if let Some(open_file) = &self.open_file {
            validate_open_file(open_file)?;
        }

        Ok(())
    }

    /// Numeric port, without the leading colon.
    pub fn port_number(&self) -> Result<u16> {
        self.port
            .strip_prefix(':')
            .unwrap_or(&self.port)
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue {
                    field: "port".to_string(),
                    value: self.port.clone(),
                    hint: "Use a number between 0 and 65535, e.g. 8080 or :8080".to_string(),
                }
                .into()
            })
    }

    /// Socket address the HTTP listener binds.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        Ok(SocketAddr::new(self.host, self.port_number()?))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// The page to open must stay inside the served directory.
pub fn validate_open_file(path: &str) -> Result<()> {
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(ConfigError::InvalidValue {
            field: "openFile".to_string(),
            value: path.to_string(),
            hint: "Use a path relative to the watched directory, e.g. docs/index.html"
                .to_string(),
        }
        .into());
    }

    Ok(())
}
