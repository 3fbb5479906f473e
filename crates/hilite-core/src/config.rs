//! Summary run configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file with a `[summary]` table (path in `HILITE_CONFIG`)
//! - environment variables (`HILITE_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use hilite_core::config::SummaryConfig;
//!
//! // File from HILITE_CONFIG if set, else environment variables
//! let config = SummaryConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = SummaryConfig::from_file(std::path::Path::new("hilite.toml")).expect("Failed to load");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one summary run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Annotation color collected into the summary (`#rgb` or `#rrggbb`).
    pub target_color: String,
    /// Title rendered in the note header.
    pub title: String,
    /// Prefix identifying notes the host generated from annotations.
    pub host_citation_marker: String,
    /// Delete host-generated annotation notes during cleanup, whatever their color.
    pub remove_host_annotation_notes: bool,
    /// Select the created notes in the host pane after the run.
    pub select_created: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            target_color: defaults::TARGET_COLOR.to_string(),
            title: defaults::SUMMARY_TITLE.to_string(),
            host_citation_marker: defaults::HOST_CITATION_MARKER.to_string(),
            remove_host_annotation_notes: defaults::REMOVE_HOST_ANNOTATION_NOTES,
            select_created: defaults::SELECT_CREATED,
        }
    }
}

impl SummaryConfig {
    /// Default configuration targeting `color`.
    pub fn for_color(color: impl Into<String>) -> Self {
        Self {
            target_color: color.into(),
            ..Self::default()
        }
    }

    /// Replace the target color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.target_color = color.into();
        self
    }

    /// Exact header prefix written into, and matched against, summary notes.
    ///
    /// Embeds the configured color verbatim so the match stays byte-exact.
    pub fn header_prefix(&self) -> String {
        format!("<h2>{} ({}", self.title, self.target_color)
    }

    /// Lowercase target color used for comparisons and the structured tag.
    pub fn normalized_color(&self) -> String {
        self.target_color.to_ascii_lowercase()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_hex_color(&self.target_color) {
            return Err(ConfigError::Validation(format!(
                "target_color must be #rgb or #rrggbb, got: {}",
                self.target_color
            )));
        }

        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title cannot be empty".to_string()));
        }

        if self.host_citation_marker.is_empty() {
            return Err(ConfigError::Validation(
                "host_citation_marker cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from the file named by `HILITE_CONFIG`, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        match env::var(defaults::CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                info!("Loading summary config from: {}", path);
                Self::from_file(Path::new(&path))
            }
            _ => {
                debug!(
                    "{} not set, using environment variables",
                    defaults::CONFIG_PATH_ENV
                );
                Self::from_env()
            }
        }
    }

    /// Load configuration from a TOML file with a `[summary]` table.
    ///
    /// Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text with a `[summary]` table.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            summary: SummaryConfig,
        }

        let root: TomlRoot = toml::from_str(content)?;
        root.summary.validate()?;
        Ok(root.summary)
    }

    /// Load configuration from `HILITE_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env-style keys).
    ///
    /// Recognized keys: `HILITE_TARGET_COLOR`, `HILITE_TITLE`,
    /// `HILITE_CITATION_MARKER`, `HILITE_REMOVE_HOST_NOTES`, `HILITE_SELECT_CREATED`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &str| format!("{}{}", defaults::ENV_PREFIX, name);
        let mut config = Self::default();

        if let Some(color) = lookup(&key("TARGET_COLOR")) {
            config.target_color = color;
        }
        if let Some(title) = lookup(&key("TITLE")) {
            config.title = title;
        }
        if let Some(marker) = lookup(&key("CITATION_MARKER")) {
            config.host_citation_marker = marker;
        }
        if let Some(value) = lookup(&key("REMOVE_HOST_NOTES")) {
            config.remove_host_annotation_notes = parse_bool(&key("REMOVE_HOST_NOTES"), &value)?;
        }
        if let Some(value) = lookup(&key("SELECT_CREATED")) {
            config.select_created = parse_bool(&key("SELECT_CREATED"), &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// `#` followed by exactly 3 or 6 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
