pub mod classifier;
pub mod language;
pub mod locale;
pub mod model;

#[cfg(test)]
mod tests;

pub use classifier::{ClassifyError, LanguageClassifier, Prediction, WhatlangClassifier};
pub use language::LanguageDetector;
pub use model::{Detection, ExtractedLanguage, LanguageSource};

use scraper::Html;
use tracing::instrument;

use crate::response::PageResponse;

/// Fill the `language` field of an extraction result for `resp`.
#[instrument(skip_all, fields(url = %resp.url_final))]
pub fn extract(resp: &PageResponse, detector: &LanguageDetector) -> ExtractedLanguage {
    let document = Html::parse_document(&resp.body_utf8);
    let detection = detector.detect_with_source(&document);

    ExtractedLanguage {
        url: resp.url_final.clone(),
        source: detection.as_ref().map(|d| d.source),
        language: detection.map(|d| d.code),
        fetched_at: resp.fetched_at,
    }
}
