//! Page handoff.
//!
//! # Responsibilities
//! - Collect everything a page needs from a route match
//! - Attach the locale's content data and the page meta resolved from it
//! - Hand it to the configured renderer
//!
//! # Design Decisions
//! - Rendering is pluggable; the default renderer emits the view as JSON
//! - Canonical URL is `host + base + normalized path`
//! - Page metas are keyed by the path below the locale segment (`/about`),
//!   then by the configured route path (`/missions/{mission}`)

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::SiteConfig;
use crate::locale::data::{not_found_meta, resolve_meta};
use crate::locale::split_code;
use crate::routing::RouteMatch;
use crate::state::SiteState;

/// Data passed to the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Route path as configured, e.g. `/missions/{mission}`. `None` for a 404.
    pub page: Option<String>,
    /// Route path used for matching, e.g. `/{locale}/missions/{mission}`.
    pub route: Option<String>,
    /// Normalized request path.
    pub path: String,
    pub locale: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub parameters: BTreeMap<String, String>,
    /// Route metadata from configuration.
    pub meta: Map<String, Value>,
    /// Meta from the locale data file.
    pub page_meta: Map<String, Value>,
    /// The locale's whole data file.
    pub data: Option<Arc<Value>>,
    pub url: String,
    pub version: String,
}

impl PageView {
    pub fn new(matched: &RouteMatch, site: &SiteState) -> Self {
        let locale = matched.locale.as_deref();
        let data = locale.and_then(|code| site.locale_data.get(code)).cloned();

        let page_meta = match (&data, locale) {
            (Some(data), Some(code)) => {
                let below_locale = page_below_locale(&matched.path, code);
                resolve_meta(data, &[below_locale, matched.route.source_path()])
            }
            _ => Map::new(),
        };

        Self {
            page: Some(matched.route.source_path().to_string()),
            route: Some(matched.route.path().to_string()),
            parameters: matched.parameters.iter().cloned().collect(),
            meta: matched.route.meta().clone(),
            page_meta,
            ..Self::base(&matched.path, locale, data, &site.config)
        }
    }

    /// View for a path no route matched, in `locale` when the path named one.
    pub fn not_found(path: &str, locale: Option<&str>, site: &SiteState) -> Self {
        let data = locale.and_then(|code| site.locale_data.get(code)).cloned();
        let page_meta = not_found_meta(data.as_deref().unwrap_or(&Value::Null));
        Self {
            page_meta,
            ..Self::base(path, locale, data, &site.config)
        }
    }

    fn base(path: &str, locale: Option<&str>, data: Option<Arc<Value>>, config: &SiteConfig) -> Self {
        let (language, country) = match locale {
            Some(code) => {
                let (language, country) = split_code(code, &config.locales.separator);
                (Some(language.to_string()), Some(country.to_string()))
            }
            None => (None, None),
        };

        let url = format!(
            "{}{}{}",
            config.site.host.trim_end_matches('/'),
            config.site.base.trim_end_matches('/'),
            path
        );

        Self {
            page: None,
            route: None,
            path: path.to_string(),
            locale: locale.map(str::to_string),
            language,
            country,
            parameters: BTreeMap::new(),
            meta: Map::new(),
            page_meta: Map::new(),
            data,
            url,
            version: config.site.version.clone(),
        }
    }
}

/// `/fr-fr/about` in `fr-fr` is `/about`; the locale root is `/`.
fn page_below_locale<'a>(path: &'a str, code: &str) -> &'a str {
    match path.strip_prefix('/').and_then(|p| p.strip_prefix(code)) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Turns a page view into a response.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &PageView) -> Response;

    /// Response for a path no route matched.
    fn render_not_found(&self, _page: &PageView) -> Response {
        (StatusCode::NOT_FOUND, "Page not found").into_response()
    }
}

/// Renders the page view as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageRenderer;

impl PageRenderer for JsonPageRenderer {
    fn render(&self, page: &PageView) -> Response {
        Json(page).into_response()
    }

    fn render_not_found(&self, page: &PageView) -> Response {
        (StatusCode::NOT_FOUND, Json(page)).into_response()
    }
}
