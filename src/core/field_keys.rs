//! Keys of the well-known fields
//!
//! Message, error, logger and timestamp are stored as ordinary fields. Their
//! key names are not hardcoded; each provider hands out a [`FieldKeysSpec`].

use super::error::{FacadeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_MESSAGE_KEY: &str = "message";
pub const DEFAULT_ERROR_KEY: &str = "error";
pub const DEFAULT_LOGGER_KEY: &str = "logger";
pub const DEFAULT_TIMESTAMP_KEY: &str = "timestamp";

/// Names of the well-known field keys
pub trait FieldKeysSpec: Send + Sync + fmt::Debug {
    fn message(&self) -> &str;
    fn error(&self) -> &str;
    fn logger(&self) -> &str;
    fn timestamp(&self) -> &str;
}

/// Serde-configurable [`FieldKeysSpec`]
///
/// Missing entries fall back to `message`, `error`, `logger` and `timestamp`.
///
/// # Example
///
/// ```
/// use rust_logger_facade::core::{DefaultFieldKeysSpec, FieldKeysSpec};
///
/// let keys = DefaultFieldKeysSpec::from_json(r#"{"message": "msg"}"#).unwrap();
/// assert_eq!(keys.message(), "msg");
/// assert_eq!(keys.error(), "error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFieldKeysSpec {
    pub message: String,
    pub error: String,
    pub logger: String,
    pub timestamp: String,
}

impl Default for DefaultFieldKeysSpec {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE_KEY.to_string(),
            error: DEFAULT_ERROR_KEY.to_string(),
            logger: DEFAULT_LOGGER_KEY.to_string(),
            timestamp: DEFAULT_TIMESTAMP_KEY.to_string(),
        }
    }
}

impl DefaultFieldKeysSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>) -> Self {
        self.message = key.into();
        self
    }

    #[must_use]
    pub fn with_error(mut self, key: impl Into<String>) -> Self {
        self.error = key.into();
        self
    }

    #[must_use]
    pub fn with_logger(mut self, key: impl Into<String>) -> Self {
        self.logger = key.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, key: impl Into<String>) -> Self {
        self.timestamp = key.into();
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Every key must be non-empty and distinct from the others
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("message", &self.message),
            ("error", &self.error),
            ("logger", &self.logger),
            ("timestamp", &self.timestamp),
        ];

        for (idx, (name, key)) in keys.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(FacadeError::config(
                    "DefaultFieldKeysSpec",
                    format!("{} key is empty", name),
                ));
            }
            if let Some((other, _)) = keys[..idx].iter().find(|(_, k)| k == key) {
                return Err(FacadeError::config(
                    "DefaultFieldKeysSpec",
                    format!("{} and {} keys are both '{}'", other, name, key),
                ));
            }
        }
        Ok(())
    }
}

impl FieldKeysSpec for DefaultFieldKeysSpec {
    fn message(&self) -> &str {
        &self.message
    }

    fn error(&self) -> &str {
        &self.error
    }

    fn logger(&self) -> &str {
        &self.logger
    }

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
