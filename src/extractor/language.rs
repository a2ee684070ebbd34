//! Language detection for a single parsed article page.
//!
//! [`LanguageDetector`] walks a fixed fallback chain and stops at the first
//! step that yields a code:
//!
//! 1. classifier on the largest article container seen so far,
//! 2. classifier on the whole document text,
//! 3. `lang` / `xml:lang` on the root element,
//! 4. `<meta name="language">` / `<meta property="og:locale">`,
//!
//! with raw tags from steps 3 and 4 reduced to a two-letter code by
//! [`normalize_lang_tag`].

use std::sync::{Arc, LazyLock};

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument, warn};

use crate::config::{ConfigError, DEFAULT_ARTICLE_SELECTOR, DetectorConfig, ENV_ARTICLE_SELECTOR};
use crate::extractor::classifier::{ClassifyError, LanguageClassifier};
use crate::extractor::locale::normalize_lang_tag;
use crate::extractor::model::{Detection, LanguageSource, normalize_whitespace};

/// Text under these elements never reaches the classifier.
const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements whose boundaries separate words in rendered text.
const BLOCK_TAGS: [&str; 37] = [
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td",
    "th", "title", "tr", "ul",
];

static ARTICLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DEFAULT_ARTICLE_SELECTOR).unwrap());

static META_LANGUAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="language"]"#).unwrap());

static OG_LOCALE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:locale"]"#).unwrap());

#[derive(Clone)]
pub struct LanguageDetector {
    classifier: Arc<dyn LanguageClassifier>,
    article_selector: Selector,
}

impl LanguageDetector {
    pub fn new(classifier: Arc<dyn LanguageClassifier>) -> Self {
        Self {
            classifier,
            article_selector: ARTICLE_SELECTOR.clone(),
        }
    }

    pub fn from_config(
        config: &DetectorConfig,
        classifier: Arc<dyn LanguageClassifier>,
    ) -> Result<Self, ConfigError> {
        let article_selector =
            Selector::parse(config.article_selector()).map_err(|err| ConfigError::InvalidValue {
                field: ENV_ARTICLE_SELECTOR,
                reason: err.to_string(),
            })?;

        Ok(Self {
            classifier,
            article_selector,
        })
    }

    /// Two-letter language code of the document, if any step finds one.
    pub fn detect(&self, document: &Html) -> Option<String> {
        self.detect_with_source(document)
            .map(|detection| detection.code)
    }

    /// Parse `html` and detect its language.
    pub fn detect_html(&self, html: &str) -> Option<String> {
        self.detect(&Html::parse_document(html))
    }

    /// Like [`detect`](Self::detect), also reporting which step produced the
    /// code.
    #[instrument(skip_all)]
    pub fn detect_with_source(&self, document: &Html) -> Option<Detection> {
        let detection = self
            .classify_articles(document)
            .or_else(|| self.classify_body(document))
            .or_else(|| metadata_language(document));

        match &detection {
            Some(found) => debug!(
                code = %found.code,
                source = ?found.source,
                metadata = found.source.is_metadata(),
                "language detected"
            ),
            None => debug!("no language signal found"),
        }

        detection
    }

    // The longest block is re-classified after every container, so the first
    // container that gets a label wins even if a longer one follows it.
    fn classify_articles(&self, document: &Html) -> Option<Detection> {
        let mut largest: Option<(usize, String)> = None;

        for article in document.select(&self.article_selector) {
            let block = normalize_whitespace(&visible_text(article));
            let len = block.chars().count();
            if largest.as_ref().is_none_or(|(max, _)| len > *max) {
                largest = Some((len, block));
            }

            if let Some((_, text)) = &largest
                && let Some(code) = self.classify(text)
            {
                return Some(Detection {
                    code,
                    source: LanguageSource::Article,
                });
            }
        }

        None
    }

    fn classify_body(&self, document: &Html) -> Option<Detection> {
        let text = normalize_whitespace(&visible_text(document.root_element()));
        self.classify(&text).map(|code| Detection {
            code,
            source: LanguageSource::Body,
        })
    }

    fn classify(&self, text: &str) -> Option<String> {
        match self.classifier.predict(text) {
            Ok(predictions) => predictions.first().and_then(|top| top.language_code()),
            Err(ClassifyError::InvalidInput(reason)) => {
                debug!(%reason, "text not classifiable");
                None
            }
            Err(err) => {
                warn!(error = %err, "language classifier failed");
                None
            }
        }
    }
}

/// Raw tag from root attributes or meta tags, normalized to a code.
///
/// Only the first raw tag found is considered.
fn metadata_language(document: &Html) -> Option<Detection> {
    let root = document.root_element();

    let (raw, source) = non_blank(root.value().attr("lang"))
        .map(|raw| (raw, LanguageSource::LangAttribute))
        .or_else(|| {
            non_blank(root.value().attr("xml:lang"))
                .map(|raw| (raw, LanguageSource::XmlLangAttribute))
        })
        .or_else(|| {
            meta_content(document, &META_LANGUAGE_SELECTOR)
                .map(|raw| (raw, LanguageSource::MetaLanguage))
        })
        .or_else(|| {
            meta_content(document, &OG_LOCALE_SELECTOR).map(|raw| (raw, LanguageSource::OgLocale))
        })?;

    match normalize_lang_tag(raw) {
        Some(code) => Some(Detection { code, source }),
        None => {
            debug!(raw, ?source, "language tag did not normalize");
            None
        }
    }
}

fn meta_content<'a>(document: &'a Html, selector: &Selector) -> Option<&'a str> {
    document
        .select(selector)
        .next()
        .and_then(|meta| non_blank(meta.value().attr("content")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Text under `element`, skipping script-like content.
///
/// Inline markup is concatenated as is (`Wo<b>rd</b>s` reads `Words`); a
/// block boundary becomes a space so adjacent paragraphs do not merge.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in element.descendants() {
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_VISIBLE_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        match node.value() {
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => out.push(' '),
            Node::Text(text) => {
                let after_block = node
                    .prev_sibling()
                    .and_then(|sibling| sibling.value().as_element())
                    .is_some_and(|el| BLOCK_TAGS.contains(&el.name()));
                if after_block {
                    out.push(' ');
                }
                out.push_str(text);
            }
            _ => {}
        }
    }

    out
}
