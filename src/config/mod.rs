//! Configuration handling for language detection.
//!
//! `DetectorConfig::from_env` reads the tuning knobs from environment
//! variables and falls back to defaults that work for typical news pages.
//! Every value is validated on load so a bad deployment fails before the
//! first document is processed.

use std::env;
use std::str::FromStr;

use scraper::Selector;
use thiserror::Error;

/// Environment variable names. Public so tests and embedding services can
/// refer to them.
pub const ENV_ARTICLE_SELECTOR: &str = "ARTICLE_LANG_ARTICLE_SELECTOR";
pub const ENV_MIN_CONFIDENCE: &str = "ARTICLE_LANG_MIN_CONFIDENCE";
pub const ENV_MIN_TEXT_LENGTH: &str = "ARTICLE_LANG_MIN_TEXT_LENGTH";
pub const ENV_MAX_BODY_BYTES: &str = "ARTICLE_LANG_MAX_BODY_BYTES";

/// Default values used when environment variables are absent.
pub const DEFAULT_ARTICLE_SELECTOR: &str = "article";
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.25;
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 50;
pub const DEFAULT_MAX_BODY_BYTES: u64 = 5 * 1024 * 1024; // 5MB

/// Runtime configuration for the detector, its classifier and the response
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    article_selector: String,
    min_confidence: f64,
    min_text_length: usize,
    max_body_bytes: u64,
}

impl DetectorConfig {
    /// Create a config explicitly, validating every field.
    pub fn new(
        article_selector: impl Into<String>,
        min_confidence: f64,
        min_text_length: usize,
        max_body_bytes: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            article_selector: article_selector.into(),
            min_confidence,
            min_text_length,
            max_body_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let article_selector = env::var(ENV_ARTICLE_SELECTOR)
            .unwrap_or_else(|_| DEFAULT_ARTICLE_SELECTOR.to_string());
        let min_confidence = parse_var(ENV_MIN_CONFIDENCE, DEFAULT_MIN_CONFIDENCE)?;
        let min_text_length = parse_var(ENV_MIN_TEXT_LENGTH, DEFAULT_MIN_TEXT_LENGTH)?;
        let max_body_bytes = parse_var(ENV_MAX_BODY_BYTES, DEFAULT_MAX_BODY_BYTES)?;

        Self::new(
            article_selector,
            min_confidence,
            min_text_length,
            max_body_bytes,
        )
    }

    /// CSS selector matching article container elements.
    pub fn article_selector(&self) -> &str {
        &self.article_selector
    }

    /// Minimum classifier confidence for a prediction to count.
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Texts shorter than this many characters are not classified.
    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }

    /// Largest response body accepted by `process_response`.
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Err(err) = Selector::parse(&self.article_selector) {
            return Err(ConfigError::InvalidValue {
                field: ENV_ARTICLE_SELECTOR,
                reason: format!("invalid css selector {:?}: {}", self.article_selector, err),
            });
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: ENV_MIN_CONFIDENCE,
                reason: format!("{} is outside [0, 1]", self.min_confidence),
            });
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_BODY_BYTES,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            article_selector: DEFAULT_ARTICLE_SELECTOR.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: format!("cannot parse {:?}: {}", raw, err),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
