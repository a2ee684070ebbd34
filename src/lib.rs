pub mod config;
pub mod extractor;
pub mod response;

pub use config::{ConfigError, DetectorConfig};
pub use extractor::{
    ClassifyError, Detection, ExtractedLanguage, LanguageClassifier, LanguageDetector,
    LanguageSource, Prediction, WhatlangClassifier, extract,
};
pub use response::{PageResponse, ResponseError, process_response};
