use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_DELAY_SECONDS: u64 = 300;

/// One configured row of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub label: String,
    /// Extraction pattern; capture group 1 becomes the displayed value.
    #[serde(rename = "regex", alias = "pattern", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub label_align_right: bool,
    pub measure_align_right: bool,
    pub indent: bool,
    pub smaller: bool,
    pub is_separator: bool,
}

impl MeasureConfig {
    /// A regular measure with a label and an extraction pattern.
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// A separator row: label only, never extracted.
    pub fn separator(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_separator: true,
            ..Self::default()
        }
    }

    /// The pattern, with empty strings treated as absent.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether a fetch cycle should try to extract a value for this row.
    pub fn is_extractable(&self) -> bool {
        !self.is_separator && self.pattern().is_some()
    }
}

/// Settings bundle for one desklet instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskletConfig {
    pub url: String,
    pub delay_seconds: u64,
    pub measures: Vec<MeasureConfig>,
    pub last_update_pattern: Option<String>,
    pub offline_pattern: Option<String>,
}

impl Default for DeskletConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            delay_seconds: DEFAULT_DELAY_SECONDS,
            measures: Vec::new(),
            last_update_pattern: None,
            offline_pattern: None,
        }
    }
}

impl DeskletConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }

    /// Checks the settings that would make every cycle fail outright.
    /// Patterns are not checked here; a bad pattern only blanks its own row.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.url).map_err(|err| ConfigError::InvalidUrl {
            url: self.url.clone(),
            message: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        if self.delay_seconds == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("unsupported url scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("refresh delay must be at least one second")]
    ZeroDelay,
}
