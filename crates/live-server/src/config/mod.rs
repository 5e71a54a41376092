//! Configuration for the live server with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and a config file.
//! Priority: CLI > Environment > File > Defaults
//!
//! The file is `live-server.json` in the working directory (or the path
//! given with `--config`) and uses camelCase keys:
//!
//! ```json
//! {
//!   "watchDir": "public",
//!   "port": 3000,
//!   "browser": false
//! }
//! ```
//!
//! Environment variables use the `LIVE_SERVER_` prefix with snake_case
//! names, e.g. `LIVE_SERVER_WATCH_DIR=public` or `LIVE_SERVER_PORT=3000`.

mod defaults;
mod loading;
mod validation;

use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

pub use defaults::*;

/// Name of the config file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "live-server.json";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "LIVE_SERVER_";

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory to serve and watch
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Listening port, always stored with its leading colon (":8080")
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: String,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Open the default browser after startup
    #[serde(default = "default_browser")]
    pub browser: bool,

    /// Page to open in the browser, relative to the watched directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_file: Option<String>,

    /// Start watching directories created while the server runs
    #[serde(default)]
    pub watch_new_dirs: bool,

    /// Quiet period that groups a burst of file changes into one reload
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Settings given explicitly on the command line.
///
/// Unset fields are skipped when serialized, so they never shadow values
/// from the file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_new_dirs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl From<&crate::cli::Cli> for ConfigOverrides {
    fn from(cli: &crate::cli::Cli) -> Self {
        Self {
            watch_dir: cli.watch_dir.clone(),
            port: cli.port.clone(),
            host: cli.host,
            browser: cli.browser,
            open_file: cli.open_file.clone(),
            // A bare switch can only turn the feature on.
            watch_new_dirs: cli.watch_new_dirs.then_some(true),
            debounce_ms: cli.debounce_ms,
        }
    }
}

/// Accept the port as `":8080"`, `"8080"` or `8080` and store it normalized.
fn deserialize_port<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u64),
        Text(String),
    }

    Ok(match PortValue::deserialize(deserializer)? {
        PortValue::Number(n) => format!(":{}", n),
        PortValue::Text(s) => crate::cli::normalize_port(s.trim()),
    })
}
