use bytes::Bytes;
use std::fs;
use std::sync::Arc;
use url::Url;

use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::extractor::{LanguageDetector, LanguageSource, WhatlangClassifier, extract};
use crate::response::{PageResponse, process_response};

fn detector() -> LanguageDetector {
    LanguageDetector::new(Arc::new(WhatlangClassifier::new()))
}

fn fixture_response(name: &str, url: &str) -> PageResponse {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture");
    create_test_response(html, url)
}

fn create_test_response(html: String, url: &str) -> PageResponse {
    process_response(
        Url::parse(url).unwrap(),
        Bytes::from(html),
        "text/html; charset=utf-8",
        DEFAULT_MAX_BODY_BYTES,
    )
    .unwrap()
}

#[test]
fn test_article_text_beats_lang_attribute() {
    let response = fixture_response("article.html", "https://example.com/article");
    let result = extract(&response, &detector());

    // The page declares lang="de" but the article is written in English
    assert_eq!(result.language, Some("en".to_string()));
    assert_eq!(result.source, Some(LanguageSource::Article));
    assert_eq!(result.url.as_str(), "https://example.com/article");
    assert_eq!(result.fetched_at, response.fetched_at);
}

#[test]
fn test_first_article_decides_even_when_shorter() {
    let response = fixture_response("multi_article.html", "https://example.com/news");
    let result = extract(&response, &detector());

    // The second, longer article is English; the first one already yields a label
    assert_eq!(result.language, Some("fr".to_string()));
    assert_eq!(result.source, Some(LanguageSource::Article));
}

#[test]
fn test_body_text_without_articles() {
    let response = fixture_response("blog.html", "https://blog.example.com/post");
    let result = extract(&response, &detector());

    assert_eq!(result.language, Some("de".to_string()));
    assert_eq!(result.source, Some(LanguageSource::Body));
}

#[test]
fn test_og_locale_when_text_is_not_identifiable() {
    let response = fixture_response("og_locale.html", "https://example.com/numbers");
    let result = extract(&response, &detector());

    assert_eq!(result.language, Some("fr".to_string()));
    assert_eq!(result.source, Some(LanguageSource::OgLocale));
}

#[test]
fn test_empty_page_has_no_language() {
    let response = fixture_response("empty.html", "https://example.com/empty");
    let result = extract(&response, &detector());

    assert_eq!(result.language, None);
    assert_eq!(result.source, None);
}

#[test]
fn test_malformed_html() {
    let html = "<html lang=\"pt-BR\"><head><title>Quebrado</title><body><p>Tags<div>abertas"
        .to_string();

    let response = create_test_response(html, "https://example.com/broken");
    let result = extract(&response, &detector());

    assert_eq!(result.language, Some("pt".to_string()));
    assert_eq!(result.source, Some(LanguageSource::LangAttribute));
}

#[test]
fn test_stray_byte_in_body_still_detects_lang_attribute() {
    let body = Bytes::from_static(b"<html lang=\"en-US\"><body><p>caf\xff</p></body></html>");
    let response = process_response(
        Url::parse("https://example.com/stray").unwrap(),
        body,
        "text/html; charset=utf-8",
        DEFAULT_MAX_BODY_BYTES,
    )
    .unwrap();
    let result = extract(&response, &detector());

    assert_eq!(result.language, Some("en".to_string()));
    assert_eq!(result.source, Some(LanguageSource::LangAttribute));
}

#[test]
fn test_result_serializes_language_field() {
    let response = create_test_response(
        "<html><head><meta name=\"language\" content=\"English\"></head></html>".to_string(),
        "https://example.com/meta",
    );
    let result = extract(&response, &detector());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["language"], "en");
    assert_eq!(json["source"], "meta_language");
    assert_eq!(json["url"], "https://example.com/meta");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_detect_never_panics(html in ".*") {
            let _ = detector().detect_html(&html);
        }

        #[test]
        fn test_detected_code_is_two_lowercase_letters(
            lang in "[a-zA-Z_ -]{0,12}",
            body in ".{0,200}",
        ) {
            let html = format!("<html lang=\"{lang}\"><body>{body}</body></html>");
            if let Some(code) = detector().detect_html(&html) {
                prop_assert_eq!(code.len(), 2);
                prop_assert!(code.chars().all(|c| c.is_ascii_lowercase()));
            }
        }
    }
}
