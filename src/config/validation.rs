//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check locale settings are usable in multi-locale mode
//! - Detect duplicate and malformed route paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Placeholder syntax is checked by the route compiler, not here

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SiteConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("locales.default must be set when multi-locale routing is enabled")]
    MissingDefaultLocale,

    #[error("locales.separator must not be empty")]
    EmptySeparator,

    #[error("locales.services `{0}` must be a single non-empty path segment")]
    InvalidServicesPrefix(String),

    #[error("route `{0}` must start with `/`")]
    RelativeRoute(String),

    #[error("route `{0}` is declared more than once")]
    DuplicateRoute(String),

    #[error("site.host `{host}` is not a valid URL: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("site.base `{0}` must start and end with `/`")]
    InvalidBase(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let locales = &config.locales;

    if locales.multi_locale && locales.default_locale.trim().is_empty() {
        errors.push(ValidationError::MissingDefaultLocale);
    }

    if locales.separator.is_empty() {
        errors.push(ValidationError::EmptySeparator);
    }

    let prefix = &locales.services_prefix;
    if prefix.is_empty() || prefix.contains('/') || prefix.to_lowercase() != *prefix {
        errors.push(ValidationError::InvalidServicesPrefix(prefix.clone()));
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativeRoute(route.path.clone()));
            continue;
        }
        let identity = route.path.trim_end_matches('/');
        if !seen.insert(identity.to_string()) {
            errors.push(ValidationError::DuplicateRoute(route.path.clone()));
        }
    }

    if let Err(e) = url::Url::parse(&config.site.host) {
        errors.push(ValidationError::InvalidHost {
            host: config.site.host.clone(),
            reason: e.to_string(),
        });
    }

    let base = &config.site.base;
    if !base.starts_with('/') || !base.ends_with('/') {
        errors.push(ValidationError::InvalidBase(base.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
