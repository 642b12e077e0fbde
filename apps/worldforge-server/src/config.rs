use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server configuration, loaded from YAML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// Backing world document.
    pub world_path: PathBuf,
    /// Directory of `<name>.json` structure templates.
    pub structures_dir: PathBuf,
    /// Directory served at `/` for the browser viewer.
    pub static_dir: PathBuf,
    /// Seconds between autosave flushes.
    pub autosave_secs: u64,
    /// Write an empty world document at startup if none exists.
    pub create_if_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            world_path: PathBuf::from("world.json"),
            structures_dir: PathBuf::from("structures"),
            static_dir: PathBuf::from("static"),
            autosave_secs: worldforge_persist::DEFAULT_INTERVAL.as_secs(),
            create_if_missing: false,
        }
    }
}

impl Config {
    /// Load and validate a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.autosave_secs == 0 {
            bail!("autosave_secs must be greater than zero");
        }
        if self.world_path.as_os_str().is_empty() {
            bail!("world_path must not be empty");
        }
        if self.structures_dir.as_os_str().is_empty() {
            bail!("structures_dir must not be empty");
        }
        Ok(())
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }
}
