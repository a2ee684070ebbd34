use thiserror::Error;
use whatlang::{Detector, Lang};

use crate::config::{DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_TEXT_LENGTH, DetectorConfig};

const LABEL_PREFIX: &str = "__label__";

/// A ranked candidate returned by a [`LanguageClassifier`].
///
/// Labels follow the fastText convention (`__label__en`): the language code
/// is always the last two characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(code: &str, score: f64) -> Self {
        Self {
            label: format!("{LABEL_PREFIX}{code}"),
            score,
        }
    }

    /// Trailing two-letter code of the label, lowercased.
    pub fn language_code(&self) -> Option<String> {
        let mut tail = self.label.chars().rev().take(2);
        let (last, first) = (tail.next()?, tail.next()?);
        if first.is_ascii_alphabetic() && last.is_ascii_alphabetic() {
            Some([first, last].iter().collect::<String>().to_ascii_lowercase())
        } else {
            None
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// The text cannot be classified at all (e.g. it is empty).
    #[error("invalid classifier input: {0}")]
    InvalidInput(String),

    #[error("classifier failure: {0}")]
    Model(String),
}

/// Text classification model used by the detector.
///
/// Implementations must be safe to call from several threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait LanguageClassifier: Send + Sync {
    /// Ranked predictions for `text`, best first. An empty list means the
    /// model has no opinion.
    fn predict(&self, text: &str) -> Result<Vec<Prediction>, ClassifyError>;
}

/// [`LanguageClassifier`] backed by whatlang's trigram model.
pub struct WhatlangClassifier {
    detector: Detector,
    min_confidence: f64,
    min_text_length: usize,
}

impl WhatlangClassifier {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_TEXT_LENGTH)
    }

    pub fn with_thresholds(min_confidence: f64, min_text_length: usize) -> Self {
        Self {
            detector: Detector::new(),
            min_confidence,
            min_text_length,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::with_thresholds(config.min_confidence(), config.min_text_length())
    }
}

impl Default for WhatlangClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn predict(&self, text: &str) -> Result<Vec<Prediction>, ClassifyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClassifyError::InvalidInput("empty text".to_string()));
        }

        // Skip detection for very short text
        if text.chars().count() < self.min_text_length {
            return Ok(Vec::new());
        }

        let Some(info) = self.detector.detect(text) else {
            return Ok(Vec::new());
        };

        if info.confidence() < self.min_confidence {
            return Ok(Vec::new());
        }

        Ok(iso_639_1(info.lang())
            .map(|code| vec![Prediction::new(code, info.confidence())])
            .unwrap_or_default())
    }
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ukr => "uk",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Jpn => "ja",
        Lang::Heb => "he",
        Lang::Pol => "pl",
        Lang::Kor => "ko",
        Lang::Nob => "nb",
        Lang::Dan => "da",
        Lang::Swe => "sv",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Nld => "nl",
        Lang::Hun => "hu",
        Lang::Ces => "cs",
        Lang::Ell => "el",
        Lang::Bul => "bg",
        Lang::Ron => "ro",
        Lang::Hrv => "hr",
        Lang::Srp => "sr",
        Lang::Lit => "lt",
        Lang::Lav => "lv",
        Lang::Est => "et",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Cat => "ca",
        Lang::Afr => "af",
        Lang::Lat => "la",
        Lang::Epo => "eo",
        Lang::Ben => "bn",
        Lang::Kat => "ka",
        Lang::Yid => "yi",
        Lang::Bel => "be",
        Lang::Mkd => "mk",
        Lang::Tam => "ta",
        Lang::Urd => "ur",
        Lang::Pes => "fa",
        Lang::Aze => "az",
        Lang::Tgl => "tl",
        Lang::Hye => "hy",
        Lang::Zul => "zu",
        // Remaining whatlang languages have no two-letter mapping here
        _ => return None,
    };
    Some(code)
}
