//! Locale negotiation.
//!
//! # Responsibilities
//! - Recognize a locale named directly in the request path
//! - Otherwise pick the visitor's preferred locale from cookie or browser
//! - Fall back to the configured default
//!
//! # Design Decisions
//! - Pure function of its inputs: same signals always yield the same locale
//! - A direct hit means "serve"; every other outcome means "redirect"
//! - Browser matching scans the catalog in enumeration order: the first
//!   partial match sticks, an exact match always replaces it
//! - Unknown locales are never errors, they fall through to the default

use serde::Serialize;

use crate::config::LocaleConfig;
use crate::locale::catalog::LocaleCatalog;

/// Per-request locale hints supplied by the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleSignals<'a> {
    /// Value of the locale cookie, if the request carried one.
    pub cookie: Option<&'a str>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<&'a str>,
}

/// Where a preferred locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceSource {
    Cookie,
    Browser,
    Default,
}

impl PreferenceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Browser => "browser",
            Self::Default => "default",
        }
    }
}

/// Outcome of negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiated {
    /// The path already names an available locale.
    Direct(String),
    /// The visitor should be sent to this locale.
    Preferred {
        code: String,
        source: PreferenceSource,
    },
}

impl Negotiated {
    pub fn code(&self) -> &str {
        match self {
            Self::Direct(code) | Self::Preferred { code, .. } => code,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }
}

/// Select the locale for a request whose first path segment is `segment`.
pub fn negotiate(
    segment: &str,
    signals: &LocaleSignals<'_>,
    catalog: &LocaleCatalog,
    config: &LocaleConfig,
) -> Negotiated {
    if is_locale_code(segment, &config.separator) && catalog.contains(segment) {
        return Negotiated::Direct(segment.to_string());
    }

    if let Some(cookie) = signals.cookie.filter(|c| catalog.contains(c)) {
        return Negotiated::Preferred {
            code: cookie.to_string(),
            source: PreferenceSource::Cookie,
        };
    }

    if let Some(code) = signals
        .accept_language
        .and_then(|header| match_browser_locale(header, catalog, &config.separator))
    {
        return Negotiated::Preferred {
            code: code.to_string(),
            source: PreferenceSource::Browser,
        };
    }

    Negotiated::Preferred {
        code: config.default_locale.clone(),
        source: PreferenceSource::Default,
    }
}

/// True when `segment` is `language<sep>country` with both parts non-empty.
pub fn is_locale_code(segment: &str, separator: &str) -> bool {
    match segment.split_once(separator) {
        Some((language, country)) => !language.is_empty() && !country.is_empty(),
        None => false,
    }
}

/// Split a catalog code into language and country. A missing country is empty.
///
/// Only the first two parts count: `sr-latn-rs` gives `("sr", "latn")`.
pub fn split_code<'a>(code: &'a str, separator: &str) -> (&'a str, &'a str) {
    if separator.is_empty() {
        return (code, "");
    }
    let mut parts = code.split(separator);
    let language = parts.next().unwrap_or_default();
    (language, parts.next().unwrap_or_default())
}

/// Extract `(language, country)` from the first `Accept-Language` entry.
///
/// `fr-FR,fr;q=0.9` gives `("fr", "fr")`; `en` gives `("en", "")`.
pub fn parse_accept_language(header: &str) -> (String, String) {
    let first = header.split(',').next().unwrap_or_default();
    let tag = first.split(';').next().unwrap_or_default().trim().to_lowercase();
    let mut parts = tag.split('-');
    let language = parts.next().unwrap_or_default().to_string();
    let country = parts.next().unwrap_or_default().to_string();
    (language, country)
}

/// Find the catalog entry closest to the browser's first language.
pub fn match_browser_locale<'c>(
    header: &str,
    catalog: &'c LocaleCatalog,
    separator: &str,
) -> Option<&'c str> {
    let (user_language, user_country) = parse_accept_language(header);
    let language_matches = |l: &str| !user_language.is_empty() && l == user_language;
    let country_matches = |c: &str| !user_country.is_empty() && c == user_country;

    let mut candidate = None;
    for code in catalog.iter() {
        let (language, country) = split_code(code, separator);
        let same_language = language_matches(language);
        let same_country = country_matches(country);

        if same_language && same_country {
            candidate = Some(code);
        } else if candidate.is_none() && (same_language || same_country) {
            candidate = Some(code);
        }
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LocaleConfig {
        LocaleConfig {
            multi_locale: true,
            default_locale: "en-gb".into(),
            cookie_name: Some("locale".into()),
            ..LocaleConfig::default()
        }
    }

    fn browser(header: &str) -> LocaleSignals<'_> {
        LocaleSignals {
            cookie: None,
            accept_language: Some(header),
        }
    }

    #[test]
    fn test_direct_path_hit() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let signals = LocaleSignals {
            cookie: Some("en-gb"),
            accept_language: Some("en-GB"),
        };

        let result = negotiate("fr-fr", &signals, &catalog, &config());
        assert_eq!(result, Negotiated::Direct("fr-fr".into()));
        assert!(result.is_direct());
    }

    #[test]
    fn test_segment_needs_both_parts() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-"]);
        let result = negotiate("fr-", &LocaleSignals::default(), &catalog, &config());
        assert!(!result.is_direct());
        assert_eq!(result.code(), "en-gb");
    }

    #[test]
    fn test_unknown_path_locale_is_not_direct() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let result = negotiate("de-de", &browser("fr-FR"), &catalog, &config());
        assert_eq!(
            result,
            Negotiated::Preferred {
                code: "fr-fr".into(),
                source: PreferenceSource::Browser
            }
        );
    }

    #[test]
    fn test_cookie_beats_browser() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let signals = LocaleSignals {
            cookie: Some("fr-fr"),
            accept_language: Some("en-GB"),
        };

        let result = negotiate("about", &signals, &catalog, &config());
        assert_eq!(
            result,
            Negotiated::Preferred {
                code: "fr-fr".into(),
                source: PreferenceSource::Cookie
            }
        );
    }

    #[test]
    fn test_unknown_cookie_is_ignored() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let signals = LocaleSignals {
            cookie: Some("../../etc"),
            accept_language: Some("fr"),
        };

        let result = negotiate("about", &signals, &catalog, &config());
        assert_eq!(result.code(), "fr-fr");
    }

    #[test]
    fn test_exact_match_overwrites_earlier_partial() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-gb", "fr-fr"]);
        assert_eq!(match_browser_locale("fr-fr", &catalog, "-"), Some("fr-fr"));
        // fr-gb matches on language before the exact entry is seen
        assert_eq!(match_browser_locale("fr-be", &catalog, "-"), Some("fr-gb"));
    }

    #[test]
    fn test_partial_matches_first_seen_wins() {
        let catalog = LocaleCatalog::new(["en-gb", "en-us"]);
        assert_eq!(match_browser_locale("en-CA", &catalog, "-"), Some("en-gb"));

        let reversed = LocaleCatalog::new(["en-us", "en-gb"]);
        assert_eq!(match_browser_locale("en-CA", &reversed, "-"), Some("en-us"));
    }

    #[test]
    fn test_country_only_match() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-ca"]);
        assert_eq!(match_browser_locale("iu-CA", &catalog, "-"), Some("fr-ca"));
    }

    #[test]
    fn test_language_without_country() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        assert_eq!(parse_accept_language("fr;q=0.8"), ("fr".into(), String::new()));
        assert_eq!(match_browser_locale("fr", &catalog, "-"), Some("fr-fr"));
        assert_eq!(match_browser_locale("zh", &catalog, "-"), None);
        assert_eq!(match_browser_locale("", &catalog, "-"), None);
    }

    #[test]
    fn test_script_subtag_is_taken_as_country() {
        assert_eq!(
            parse_accept_language("sr-Latn-RS,sr;q=0.9"),
            ("sr".into(), "latn".into())
        );
        assert_eq!(split_code("sr-latn-rs", "-"), ("sr", "latn"));

        let catalog = LocaleCatalog::new(["en-gb", "sr-latn"]);
        assert_eq!(match_browser_locale("sr-Latn-RS", &catalog, "-"), Some("sr-latn"));
    }

    #[test]
    fn test_custom_separator() {
        let catalog = LocaleCatalog::new(["en_gb", "fr_fr"]);
        let config = LocaleConfig {
            separator: "_".into(),
            default_locale: "en_gb".into(),
            ..config()
        };

        assert!(negotiate("fr_fr", &LocaleSignals::default(), &catalog, &config).is_direct());
        assert_eq!(
            negotiate("about", &browser("fr-FR"), &catalog, &config).code(),
            "fr_fr"
        );
    }

    #[test]
    fn test_falls_back_to_default() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let result = negotiate("about", &browser("zh-CN,zh;q=0.9"), &catalog, &config());
        assert_eq!(
            result,
            Negotiated::Preferred {
                code: "en-gb".into(),
                source: PreferenceSource::Default
            }
        );
    }

    #[test]
    fn test_deterministic() {
        let catalog = LocaleCatalog::new(["en-gb", "en-us", "fr-fr"]);
        let signals = browser("en-AU,en;q=0.8");
        let first = negotiate("", &signals, &catalog, &config());
        let second = negotiate("", &signals, &catalog, &config());
        assert_eq!(first, second);
    }
}
