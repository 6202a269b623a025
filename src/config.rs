//! Server configuration.
//!
//! Configuration is read once at startup from a YAML file and is never
//! mutated afterwards. A minimal file looks like:
//!
//! ```yaml
//! server:
//!   listen_addr: 127.0.0.1:8080
//!   timeout: 5
//!   max_requests: 32
//! plugins:
//!   static:
//!     root: ./public
//! ```
//!
//! The order of the `plugins` keys is the order in which the plugins run.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "TURBO_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

const DEFAULT_CONFIG_PATH: &str = "turbo.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Plugin name -> plugin options, in chain order.
    pub plugins: Mapping,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Idle timeout in seconds.
    pub timeout: u64,
    /// Maximum number of requests served on one connection.
    pub max_requests: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            timeout: 5,
            max_requests: 32,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut plugins = Mapping::new();
        plugins.insert(Value::from("static"), Value::Mapping(Mapping::new()));

        Self {
            server: ServerConfig::default(),
            plugins,
        }
    }
}

impl Config {
    /// Loads the configuration from `$TURBO_CONFIG` (or `turbo.yaml`), then
    /// applies the `LISTEN` override.
    ///
    /// A missing `turbo.yaml` falls back to defaults; a missing file named
    /// explicitly through the environment is an error.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty document deserializes to null
        let cfg: Config = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw).context("failed to parse YAML")?
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.server.timeout == 0 {
            anyhow::bail!("server.timeout must be at least 1 second");
        }
        if self.server.max_requests == 0 {
            anyhow::bail!("server.max_requests must be at least 1");
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout)
    }
}
