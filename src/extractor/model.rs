use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The language field of an extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedLanguage {
    pub url: Url,
    pub language: Option<String>,
    pub source: Option<LanguageSource>,
    pub fetched_at: DateTime<Utc>,
}

/// Which step of the fallback chain produced a language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSource {
    /// Classifier run on the largest `<article>` block.
    Article,
    /// Classifier run on the whole document text.
    Body,
    LangAttribute,
    XmlLangAttribute,
    MetaLanguage,
    OgLocale,
}

impl LanguageSource {
    /// True when the code came from markup metadata rather than the classifier.
    pub fn is_metadata(&self) -> bool {
        !matches!(self, Self::Article | Self::Body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub code: String,
    pub source: LanguageSource,
}

/// Collapse every whitespace run into a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}
