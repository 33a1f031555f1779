//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `filedupes/config.toml` in the platform
//!    config directory)
//! 3. `FILEDUPES_*` environment variables
//! 4. Command-line flags
//!
//! A missing default config file is not an error. An explicit `--config`
//! path that does not exist or does not parse is.
//!
//! # Example file
//!
//! ```toml
//! min_size = "1MB"
//! output = "dupes.out"
//! exclude = ["node_modules", ".cache"]
//! cross_mount_points = false
//! io_threads = 4
//! format = "text"
//! hardlinks = "skip"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cli::{parse_size, Cli};
use crate::duplicates::{FinderConfig, HardlinkPolicy, DEFAULT_IO_THREADS};
use crate::report::ReportFormat;
use crate::scanner::{WalkerConfig, DEFAULT_MIN_SIZE};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "FILEDUPES_";

/// Default report file name.
pub const DEFAULT_OUTPUT: &str = "dupes.out";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong type.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    /// A value parsed but is out of range.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Offending key
        key: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files must be strictly larger than this many bytes.
    #[serde(deserialize_with = "deserialize_size")]
    pub min_size: u64,
    /// Report file path.
    pub output: PathBuf,
    /// Extra directory names to skip, merged with `Backups.backupdb`.
    pub exclude: Vec<String>,
    /// Descend into other filesystems.
    pub cross_mount_points: bool,
    /// Hashing threads.
    pub io_threads: usize,
    /// Report encoding.
    pub format: ReportFormat,
    /// Treatment of hard-link-only sets.
    pub hardlinks: HardlinkPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            output: PathBuf::from(DEFAULT_OUTPUT),
            exclude: Vec::new(),
            cross_mount_points: false,
            io_threads: DEFAULT_IO_THREADS,
            format: ReportFormat::default(),
            hardlinks: HardlinkPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, a config file and the environment.
    ///
    /// With `explicit` set, that file must exist. Otherwise the platform
    /// default path is used if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing, any layer
    /// fails to parse, or a value is out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => {
                let path = Self::default_path().filter(|p| p.exists());
                if let Some(ref p) = path {
                    log::debug!("Using config file {}", p.display());
                }
                Self::extract(Self::figment(path.as_deref()))
            }
        }
    }

    /// Load configuration using a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` does not exist, or another
    /// [`ConfigError`] if it does not parse.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        log::debug!("Using config file {}", path.display());
        Self::extract(Self::figment(Some(path)))
    }

    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "io_threads",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// Flags left unset keep the configured value. `--exclude` names are
    /// added to the configured ones; `--cross-mount-points` can only enable.
    #[must_use]
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        if let Some(ref output) = cli.output {
            self.output = output.clone();
        }
        for name in &cli.exclude {
            if !self.exclude.contains(name) {
                self.exclude.push(name.clone());
            }
        }
        if cli.cross_mount_points {
            self.cross_mount_points = true;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads.max(1);
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(policy) = cli.hardlinks {
            self.hardlinks = policy;
        }
        self
    }

    /// Traversal settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(
            self.min_size,
            self.exclude.clone(),
            self.cross_mount_points,
        )
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_walker_config(self.walker_config())
            .with_hardlink_policy(self.hardlinks)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "filedupes").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Accept sizes as a byte count or a string such as `"1MB"`.
fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeValue {
        Bytes(u64),
        Text(String),
    }

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(n) => Ok(n),
        SizeValue::Text(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}
