//! Available locale catalog.
//!
//! # Responsibilities
//! - Enumerate the locale codes the site has content for
//! - Answer membership queries
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards
//! - Enumeration order is kept: negotiation scans the catalog in this order
//! - Directory scans are sorted by file name so the order is reproducible

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::{ConfigError, LocaleConfig};

/// The set of locale codes available to visitors.
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    codes: Vec<String>,
    index: HashSet<String>,
}

impl LocaleCatalog {
    /// Build a catalog from codes. Repeated codes keep their first position.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for code in codes {
            let code = code.into();
            if catalog.index.insert(code.clone()) {
                catalog.codes.push(code);
            }
        }
        catalog
    }

    /// Build a catalog from locale data files found in `dir`.
    ///
    /// Each regular, non-hidden file contributes its stem (`en-gb.json` → `en-gb`).
    pub fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.is_empty() || stem.starts_with('.') {
                continue;
            }
            names.push(stem.to_string());
        }
        names.sort();
        Ok(Self::new(names))
    }

    /// Build the catalog described by the locale settings.
    pub fn from_config(config: &LocaleConfig) -> Result<Self, ConfigError> {
        if !config.available.is_empty() {
            return Ok(Self::new(config.available.iter().cloned()));
        }
        if !config.multi_locale && !config.data_dir.exists() {
            return Ok(Self::default());
        }
        Self::scan(&config.data_dir).map_err(|source| ConfigError::LocaleDirectory {
            path: config.data_dir.clone(),
            source,
        })
    }

    /// All codes in enumeration order.
    pub fn list(&self) -> &[String] {
        &self.codes
    }

    /// Iterate codes in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_and_order() {
        let catalog = LocaleCatalog::new(["fr-fr", "en-gb", "fr-fr"]);

        assert_eq!(catalog.list(), ["fr-fr", "en-gb"]);
        assert!(catalog.contains("en-gb"));
        assert!(!catalog.contains("en-us"));
        assert!(!catalog.contains("EN-GB"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fr-fr.json"), "{}").unwrap();
        fs::write(dir.path().join("en-gb.json"), "{}").unwrap();
        fs::write(dir.path().join(".gitkeep"), "").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();

        let catalog = LocaleCatalog::scan(dir.path()).unwrap();
        assert_eq!(catalog.list(), ["en-gb", "fr-fr"]);
    }

    #[test]
    fn test_explicit_list_wins_over_directory() {
        let config = LocaleConfig {
            available: vec!["de-de".into()],
            data_dir: "/nonexistent".into(),
            multi_locale: true,
            ..LocaleConfig::default()
        };

        let catalog = LocaleCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.list(), ["de-de"]);
    }

    #[test]
    fn test_missing_directory() {
        let mut config = LocaleConfig {
            data_dir: "/nonexistent/locales".into(),
            ..LocaleConfig::default()
        };
        assert!(LocaleCatalog::from_config(&config).unwrap().is_empty());

        config.multi_locale = true;
        let err = LocaleCatalog::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::LocaleDirectory { .. }));
    }
}
