//! Configuration types for logsift.
//!
//! [`Config::load`] reads a YAML file layered on top of the built-in
//! defaults. A missing file is not an error: the defaults are used as-is and
//! [`Loaded::Defaults`] tells the caller so it can warn. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in tests).

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
log_path: /var/log/nginx
log_name: access_security.log
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the live access log and its rotated archives.
    pub log_path: PathBuf,
    /// Reserved name of the live log file. Archives are
    /// `<log_name>.<suffix>.gz`.
    #[serde(default = "default_log_name")]
    pub log_name: String,
}

fn default_log_name() -> String {
    "access_security.log".to_string()
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loaded {
    File,
    /// The file did not exist; built-in defaults were used unvalidated.
    Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `path`, layered on the built-in defaults.
    ///
    /// When the file exists, `log_path` must be non-empty and must name an
    /// existing directory.
    pub fn load(path: &Path) -> anyhow::Result<(Self, Loaded)> {
        if !path.exists() {
            return Ok((Self::defaults(), Loaded::Defaults));
        }

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .with_context(|| format!("reading config file {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("parsing config file {}", path.display()))?;

        config.validate()?;
        Ok((config, Loaded::File))
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .build()
            .expect("built-in default config must be valid YAML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.log_path.as_os_str().is_empty() {
            bail!("log_path must not be empty");
        }
        if self.log_name.is_empty() {
            bail!("log_name must not be empty");
        }
        if !self.log_path.is_dir() {
            bail!("log_path does not exist: {}", self.log_path.display());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
