#![no_main]

use std::sync::{Arc, LazyLock};

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use url::Url;

use article_lang::{LanguageDetector, WhatlangClassifier, extract, process_response};

static DETECTOR: LazyLock<LanguageDetector> =
    LazyLock::new(|| LanguageDetector::new(Arc::new(WhatlangClassifier::new())));

fuzz_target!(|data: &[u8]| {
    let url = Url::parse("https://example.com").unwrap();

    // Undecodable or oversized bodies are rejected before detection
    let Ok(response) = process_response(url, Bytes::copy_from_slice(data), "text/html", 1 << 20)
    else {
        return;
    };

    // Detection should never panic regardless of input
    let _ = extract(&response, &DETECTOR);
});
