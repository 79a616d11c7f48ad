//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::RouteError;

/// Error type for configuration loading and startup compilation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Route compilation failed: {0}")]
    Route(#[from] RouteError),

    #[error("Cannot read locale directory {}: {source}", .path.display())]
    LocaleDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Default locale `{0}` is not in the locale catalog")]
    UnknownDefaultLocale(String),

    #[error("Locale code `{code}` must be lower-case `language{separator}country`")]
    InvalidLocaleCode { code: String, separator: String },

    #[error("Cannot parse locale data {}: {source}", .path.display())]
    LocaleData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [site]
        host = "https://www.example.com"
        base = "/"

        [locales]
        multi = true
        default = "en-gb"
        cookie = "site_locale"
        services = "api"
        available = ["en-gb", "fr-fr"]

        [[routes]]
        path = "/"
        page = "home"

        [[routes]]
        path = "/missions/{mission}"
        page = "mission"

        [[routes]]
        path = "/choose"
        locale = false
        page = "choose"
    "#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();

        assert!(config.locales.multi_locale);
        assert_eq!(config.locales.default_locale, "en-gb");
        assert_eq!(config.locales.cookie_name.as_deref(), Some("site_locale"));
        assert_eq!(config.locales.separator, "-");
        assert_eq!(config.routes.len(), 3);
        assert_eq!(config.routes[1].path, "/missions/{mission}");
        assert_eq!(config.routes[1].meta["page"], "mission");
        assert!(config.routes[2].is_locale_independent());
        assert!(!config.routes[2].meta.contains_key("locale"));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let err = parse_config("[locales]\nmulti = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("locales.default"));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = parse_config("[locales\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.site.host, "https://www.example.com");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/site.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
