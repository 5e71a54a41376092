use crate::config::{CONFIG_FILE_NAME, ConfigOverrides, ENV_PREFIX, ServerConfig, defaults::*};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::Path;

/// Environment keys we read, in their snake_case form.
const ENV_KEYS: &[&str] = &[
    "watch_dir",
    "port",
    "host",
    "browser",
    "open_file",
    "watch_new_dirs",
    "debounce_ms",
];

impl ServerConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// `config_path` must exist when given; without it, `live-server.json`
    /// in the working directory is used if present.
    pub fn load(overrides: &ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "Loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(env_provider());

        figment = figment.merge(Serialized::defaults(overrides));

        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()).into())
    }

    /// Get default configuration values.
    pub fn default_config() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            port: default_port(),
            host: default_host(),
            browser: default_browser(),
            open_file: None,
            watch_new_dirs: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `LIVE_SERVER_WATCH_DIR` -> `watchDir`.
///
/// `lowercase(false)` has to come after `only` and `map`: each filter or
/// map step turns key lowercasing back on.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .only(ENV_KEYS)
        .map(|key| snake_to_camel(key.as_str()).into())
        .lowercase(false)
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
