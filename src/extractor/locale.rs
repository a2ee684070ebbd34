//! Normalization of loosely formatted language tags.
//!
//! Markup carries language hints in many shapes: `en-US`, `en_GB`,
//! `pt_BR.UTF-8`, `Deutsch`, `English (United States)`. The first pass looks
//! for a standalone two-letter token directly. When that fails the leading
//! word is run through [`normalize_locale`], which expands language names and
//! common abbreviations into a canonical `ll_RR.ENCODING` identifier, and the
//! pattern is tried again.
//!
//! The alias table covers the languages news sites commonly declare. It is a
//! subset of what a full system locale database knows about.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

// Two letters starting at a word boundary, followed by '-', '_' or another
// boundary. `en_US` needs the explicit '_' since '_' is a word character.
static LANG_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-zA-Z]{2})(?:[-_]|\b)").unwrap());

static LOCALE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("c", "C"),
        ("posix", "C"),
        // English names
        ("english", "en_EN.ISO8859-1"),
        ("american", "en_US.ISO8859-1"),
        ("british", "en_GB.ISO8859-1"),
        ("french", "fr_FR.ISO8859-1"),
        ("german", "de_DE.ISO8859-1"),
        ("spanish", "es_ES.ISO8859-1"),
        ("italian", "it_IT.ISO8859-1"),
        ("portuguese", "pt_PT.ISO8859-1"),
        ("brazilian", "pt_BR.ISO8859-1"),
        ("dutch", "nl_NL.ISO8859-1"),
        ("danish", "da_DK.ISO8859-1"),
        ("swedish", "sv_SE.ISO8859-1"),
        ("norwegian", "no_NO.ISO8859-1"),
        ("finnish", "fi_FI.ISO8859-15"),
        ("icelandic", "is_IS.ISO8859-1"),
        ("greek", "el_GR.ISO8859-7"),
        ("russian", "ru_RU.KOI8-R"),
        ("ukrainian", "uk_UA.KOI8-U"),
        ("polish", "pl_PL.ISO8859-2"),
        ("czech", "cs_CZ.ISO8859-2"),
        ("slovak", "sk_SK.ISO8859-2"),
        ("slovene", "sl_SI.ISO8859-2"),
        ("slovenian", "sl_SI.ISO8859-2"),
        ("croatian", "hr_HR.ISO8859-2"),
        ("serbian", "sr_RS.UTF-8"),
        ("hungarian", "hu_HU.ISO8859-2"),
        ("romanian", "ro_RO.ISO8859-2"),
        ("bulgarian", "bg_BG.CP1251"),
        ("turkish", "tr_TR.ISO8859-9"),
        ("hebrew", "he_IL.ISO8859-8"),
        ("arabic", "ar_AA.ISO8859-6"),
        ("japanese", "ja_JP.eucJP"),
        ("korean", "ko_KR.eucKR"),
        ("chinese", "zh_CN.eucCN"),
        ("chinese-s", "zh_CN.eucCN"),
        ("chinese-t", "zh_TW.eucTW"),
        ("thai", "th_TH.ISO8859-11"),
        ("vietnamese", "vi_VN.TCVN"),
        ("indonesian", "id_ID.ISO8859-1"),
        ("catalan", "ca_ES.ISO8859-1"),
        ("estonian", "et_EE.ISO8859-15"),
        ("latvian", "lv_LV.ISO8859-13"),
        ("lithuanian", "lt_LT.ISO8859-13"),
        ("galician", "gl_ES.ISO8859-1"),
        ("basque", "eu_ES.ISO8859-1"),
        ("welsh", "cy_GB.ISO8859-1"),
        ("irish", "ga_IE.ISO8859-1"),
        ("hindi", "hi_IN.ISCII-DEV"),
        // Native names
        ("deutsch", "de_DE.ISO8859-1"),
        ("français", "fr_FR.ISO8859-1"),
        ("francais", "fr_FR.ISO8859-1"),
        ("español", "es_ES.ISO8859-1"),
        ("espanol", "es_ES.ISO8859-1"),
        ("castellano", "es_ES.ISO8859-1"),
        ("italiano", "it_IT.ISO8859-1"),
        ("português", "pt_PT.ISO8859-1"),
        ("portugues", "pt_PT.ISO8859-1"),
        ("nederlands", "nl_NL.ISO8859-1"),
        ("dansk", "da_DK.ISO8859-1"),
        ("svenska", "sv_SE.ISO8859-1"),
        ("norsk", "no_NO.ISO8859-1"),
        ("bokmal", "nb_NO.ISO8859-1"),
        ("bokmål", "nb_NO.ISO8859-1"),
        ("nynorsk", "nn_NO.ISO8859-1"),
        ("suomi", "fi_FI.ISO8859-15"),
        ("polski", "pl_PL.ISO8859-2"),
        ("čeština", "cs_CZ.ISO8859-2"),
        ("hrvatski", "hr_HR.ISO8859-2"),
        ("magyar", "hu_HU.ISO8859-2"),
        ("română", "ro_RO.ISO8859-2"),
        ("türkçe", "tr_TR.ISO8859-9"),
        ("русский", "ru_RU.KOI8-R"),
        ("日本語", "ja_JP.eucJP"),
        ("한국어", "ko_KR.eucKR"),
        ("中文", "zh_CN.eucCN"),
        // ISO 639-2 codes
        ("eng", "en_US.ISO8859-1"),
        ("fra", "fr_FR.ISO8859-1"),
        ("fre", "fr_FR.ISO8859-1"),
        ("deu", "de_DE.ISO8859-1"),
        ("ger", "de_DE.ISO8859-1"),
        ("spa", "es_ES.ISO8859-1"),
        ("ita", "it_IT.ISO8859-1"),
        ("por", "pt_PT.ISO8859-1"),
        ("nld", "nl_NL.ISO8859-1"),
        ("dut", "nl_NL.ISO8859-1"),
        ("rus", "ru_RU.KOI8-R"),
        ("pol", "pl_PL.ISO8859-2"),
        ("swe", "sv_SE.ISO8859-1"),
        ("tur", "tr_TR.ISO8859-9"),
        ("jpn", "ja_JP.eucJP"),
        ("kor", "ko_KR.eucKR"),
        ("zho", "zh_CN.eucCN"),
        ("chi", "zh_CN.eucCN"),
        ("ara", "ar_AA.ISO8859-6"),
    ])
});

/// Find the first standalone two-letter language token in `raw`.
pub fn extract_lang_code(raw: &str) -> Option<String> {
    LANG_CODE_REGEX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Canonicalize a locale name through the alias table.
///
/// Unknown names come back unchanged.
pub fn normalize_locale(name: &str) -> String {
    let code = name.trim().to_lowercase().replace(':', ".");
    let code = code.split('@').next().unwrap_or_default();
    let lang = code.split('.').next().unwrap_or_default();

    let alias = LOCALE_ALIASES.get(lang).or_else(|| {
        lang.split_once('_')
            .and_then(|(base, _region)| LOCALE_ALIASES.get(base))
    });

    match alias {
        Some(canonical) => canonical.to_string(),
        None => name.to_string(),
    }
}

/// Reduce a raw tag string to a two-letter language code.
pub fn normalize_lang_tag(raw: &str) -> Option<String> {
    if let Some(code) = extract_lang_code(raw) {
        return Some(code);
    }

    let first = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .next()
        .unwrap_or_default();
    extract_lang_code(&normalize_locale(first))
}
