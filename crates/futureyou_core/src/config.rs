//! Runtime configuration for opening the store.
//!
//! # Responsibility
//! - Hold database, logging and flush settings in one place.
//! - Resolve overrides from `FUTURE_YOU_*` environment variables.
//!
//! # Invariants
//! - Unset or blank environment variables fall back to defaults.
//! - Malformed values are rejected, never silently replaced.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FUTURE_YOU_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FUTURE_YOU_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FUTURE_YOU_LOG_DIR";
pub const ENV_FLUSH: &str = "FUTURE_YOU_FLUSH";
pub const ENV_SEED_DEMO: &str = "FUTURE_YOU_SEED_DEMO";

const DEFAULT_DB_FILE_NAME: &str = "future_you.sqlite3";

/// When mutations are written to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Write the full state after every effective mutation.
    #[default]
    Immediate,
    /// Only mark dirty; the owner calls `Store::flush`.
    Manual,
}

impl FlushPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(Self::Immediate),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub flush_policy: FlushPolicy,
    /// Start with the demo notes when nothing has been persisted yet.
    ///
    /// Off by default, so a first run opens an empty store. Set
    /// `FUTURE_YOU_SEED_DEMO` to get the three sample notes on first launch.
    pub seed_demo_notes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            flush_policy: FlushPolicy::default(),
            seed_demo_notes: false,
        }
    }
}

impl StoreConfig {
    /// Builds a config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = var(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = var(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = var(ENV_FLUSH) {
            config.flush_policy = FlushPolicy::parse(&raw).ok_or(ConfigError::InvalidValue {
                name: ENV_FLUSH,
                value: raw,
            })?;
        }
        if let Some(raw) = var(ENV_SEED_DEMO) {
            config.seed_demo_notes = parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                name: ENV_SEED_DEMO,
                value: raw,
            })?;
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value `{value}` for `{name}`")
            }
        }
    }
}

impl Error for ConfigError {}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
