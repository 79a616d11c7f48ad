//! Per-locale content data.
//!
//! # Responsibilities
//! - Load `<data_dir>/<code>.json` once for every catalog entry
//! - Resolve the page meta a view is rendered with
//!
//! # Design Decisions
//! - A locale without a data file gets an empty object
//! - Whole-line `//` comments are allowed in data files
//! - A page without its own meta borrows the home page meta and is typed `404`

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::ConfigError;
use crate::locale::LocaleCatalog;

/// Key under which a data file lists page metas by path.
pub const METAS_KEY: &str = "metas";

/// Meta entry added to pages rendered with the home meta fallback.
pub const PAGE_TYPE_KEY: &str = "pageType";

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//.*$").expect("comment pattern is valid"));

/// Data files for every locale in the catalog, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct LocaleData {
    by_code: HashMap<String, Arc<Value>>,
}

impl LocaleData {
    /// Load one data file per catalog entry from `dir`.
    pub fn load(dir: &Path, catalog: &LocaleCatalog) -> Result<Self, ConfigError> {
        let mut by_code = HashMap::with_capacity(catalog.len());
        for code in catalog.iter() {
            let path = dir.join(format!("{code}.json"));
            let value = match fs::read_to_string(&path) {
                Ok(text) => parse_data(&text)
                    .map_err(|source| ConfigError::LocaleData { path, source })?,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(locale = %code, "No locale data file, using empty data");
                    Value::Object(Map::new())
                }
                Err(e) => return Err(ConfigError::Io(e)),
            };
            by_code.insert(code.to_string(), Arc::new(value));
        }
        Ok(Self { by_code })
    }

    /// Build from already-parsed values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            by_code: values
                .into_iter()
                .map(|(code, value)| (code.into(), Arc::new(value)))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&Arc<Value>> {
        self.by_code.get(code)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

fn parse_data(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&LINE_COMMENT_RE.replace_all(text, ""))
}

/// Meta declared for `page` in a locale's data, if any.
pub fn page_meta<'a>(data: &'a Value, page: &str) -> Option<&'a Map<String, Value>> {
    data.get(METAS_KEY)?.get(page)?.as_object()
}

/// Meta for the first of `pages` that declares one.
///
/// Falls back to the home (`/`) meta with `pageType = "404"`, or to an
/// empty meta with the same marker when the home page has none either.
pub fn resolve_meta(data: &Value, pages: &[&str]) -> Map<String, Value> {
    if let Some(meta) = pages.iter().find_map(|page| page_meta(data, page)) {
        return meta.clone();
    }
    not_found_meta(data)
}

/// Home meta marked as a not-found page.
pub fn not_found_meta(data: &Value) -> Map<String, Value> {
    let mut meta = page_meta(data, "/").cloned().unwrap_or_default();
    meta.insert(PAGE_TYPE_KEY.to_string(), Value::from("404"));
    meta
}
