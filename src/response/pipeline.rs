use crate::response::{
    errors::ResponseError,
    types::{Charset, PageResponse},
};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};
use url::Url;

const SNIFF_WINDOW: usize = 4096;

const ACCEPTED_CONTENT_TYPES: [&str; 4] = [
    "text/html",
    "application/xhtml",
    "application/xml",
    "text/xml",
];

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Turn a raw HTTP response body into a decoded `PageResponse`.
///
/// An empty `content_type` is treated as `text/html`.
#[instrument(skip(body, url_final), fields(url = %url_final, size = body.len()))]
pub fn process_response(
    url_final: Url,
    body: Bytes,
    content_type: &str,
    max_body_bytes: u64,
) -> Result<PageResponse, ResponseError> {
    let size = body.len() as u64;
    if size > max_body_bytes {
        return Err(ResponseError::BodyTooLarge {
            size,
            limit: max_body_bytes,
        });
    }

    let content_type = if content_type.trim().is_empty() {
        "text/html"
    } else {
        content_type
    };
    let lowered = content_type.to_ascii_lowercase();
    if !ACCEPTED_CONTENT_TYPES.iter().any(|ct| lowered.contains(ct)) {
        return Err(ResponseError::UnsupportedContentType(
            content_type.to_string(),
        ));
    }

    let charset = detect_charset(content_type, &body);
    debug!(?charset, "detected charset");
    let body_utf8 = decode_to_utf8(&body, &charset);

    Ok(PageResponse {
        url_final,
        body_raw: body,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = charset_from(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> / <meta http-equiv> in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = charset_from(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    // 3. Heuristic sniffing
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    Charset::from_encoding(detector.guess(None, true))
}

fn charset_from(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

// Malformed sequences are kept as U+FFFD.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body contained malformed byte sequences"
        );
    }

    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 1024 * 1024;

    fn url() -> Url {
        Url::parse("https://example.com/article").unwrap()
    }

    #[test]
    fn test_detect_charset_from_content_type() {
        let content_type = "text/html; charset=utf-8";
        let body = b"<html><head><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let content_type = "text/html";
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        // ISO-8859-1 gets mapped to Windows1252 by encoding_rs since it's a superset
        assert!(matches!(charset, Charset::Windows1252));
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let content_type = "text/html";
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";

        let charset = detect_charset(content_type, body);
        assert!(matches!(charset, Charset::Windows1252));
    }

    #[test]
    fn test_header_charset_wins_over_meta() {
        let body = b"<html><head><meta charset=\"shift_jis\"></head></html>";

        let charset = detect_charset("text/html; charset=utf-8", body);
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn test_decode_utf8() {
        let body = "Hello, 世界!".as_bytes();
        let decoded = decode_to_utf8(body, &Charset::Utf8);
        assert_eq!(decoded, "Hello, 世界!");
    }

    #[test]
    fn test_decode_windows_1252() {
        // "café" with é as a single 0xE9 byte
        let body = b"caf\xe9";
        let decoded = decode_to_utf8(body, &Charset::Windows1252);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_decode_invalid_utf8_keeps_replacement_chars() {
        let decoded = decode_to_utf8(b"abc\xff\xfe", &Charset::Utf8);
        assert_eq!(decoded, "abc\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_process_response_tolerates_stray_bytes() {
        let body = Bytes::from_static(b"<html lang=\"en\"><body><p>caf\xff</p></body></html>");
        let resp = process_response(url(), body, "text/html; charset=utf-8", LIMIT).unwrap();

        assert_eq!(resp.charset, Charset::Utf8);
        assert!(resp.body_utf8.contains("caf\u{FFFD}"));
        assert_eq!(resp.body_raw.len(), 47);
    }

    #[test]
    fn test_process_response_decodes_body() {
        let html = "<html lang=\"de\"><body><p>Grüße</p></body></html>";
        let resp = process_response(
            url(),
            Bytes::from(html),
            "text/html; charset=utf-8",
            LIMIT,
        )
        .unwrap();

        assert_eq!(resp.body_utf8, html);
        assert_eq!(resp.charset, Charset::Utf8);
        assert_eq!(resp.url_final, url());
    }

    #[test]
    fn test_process_response_defaults_missing_content_type() {
        let resp = process_response(url(), Bytes::from_static(b"<p>hi</p>"), "", LIMIT).unwrap();
        assert_eq!(resp.body_utf8, "<p>hi</p>");
    }

    #[test]
    fn test_process_response_rejects_non_html() {
        let result = process_response(
            url(),
            Bytes::from_static(b"{}"),
            "application/json",
            LIMIT,
        );
        assert!(matches!(
            result,
            Err(ResponseError::UnsupportedContentType(ct)) if ct == "application/json"
        ));
    }

    #[test]
    fn test_process_response_rejects_large_body() {
        let result = process_response(url(), Bytes::from(vec![b'a'; 64]), "text/html", 16);
        assert!(matches!(
            result,
            Err(ResponseError::BodyTooLarge { size: 64, limit: 16 })
        ));
    }
}
