//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the site front-controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public site settings (host, base path, asset version).
    pub site: SiteSettings,

    /// Locale handling.
    pub locales: LocaleConfig,

    /// Route definitions, in precedence order.
    pub routes: Vec<RouteDefinition>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Security hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Public-facing site settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Scheme and authority used for canonical URLs (e.g., "https://example.com").
    pub host: String,

    /// Base path every URL is built from. Always ends with `/`.
    pub base: String,

    /// Site version, exposed to pages for cache busting.
    pub version: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:8080".to_string(),
            base: "/".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

/// Locale negotiation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Serve every locale-aware route under a `/{locale}` prefix.
    #[serde(rename = "multi")]
    pub multi_locale: bool,

    /// Separator between language and country in a locale code.
    pub separator: String,

    /// Locale used when no preference matches the catalog.
    #[serde(rename = "default")]
    pub default_locale: String,

    /// Cookie persisting the visitor's locale. `None` disables the cookie.
    #[serde(rename = "cookie")]
    pub cookie_name: Option<String>,

    /// First path segment reserved for service dispatch.
    #[serde(rename = "services")]
    pub services_prefix: String,

    /// Directory holding one data file per available locale.
    pub data_dir: PathBuf,

    /// Explicit locale list. Takes precedence over scanning `data_dir`.
    pub available: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            multi_locale: false,
            separator: "-".to_string(),
            default_locale: String::new(),
            cookie_name: None,
            services_prefix: "api".to_string(),
            data_dir: PathBuf::from("data/locales"),
            available: Vec::new(),
        }
    }
}

/// A single route as authored in configuration.
///
/// Identity is the raw path. Everything besides `path` and `locale` is kept
/// as opaque metadata for the page renderer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteDefinition {
    /// Path pattern, may contain `{name}` placeholders.
    pub path: String,

    /// `Some(false)` marks the route locale-independent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<bool>,

    /// Page identifier, template name, and anything else the renderer needs.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl RouteDefinition {
    /// Create a route definition with no metadata.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            locale: None,
            meta: Map::new(),
        }
    }

    /// Set the locale applicability flag.
    pub fn with_locale(mut self, locale: bool) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// True when the route explicitly opts out of the locale prefix.
    pub fn is_locale_independent(&self) -> bool {
        self.locale == Some(false)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add `x-content-type-options: nosniff` to every response.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}
