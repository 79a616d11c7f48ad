//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration from disk, or fall back to defaults
//! - Build the immutable site state before any listener is bound

use std::path::Path;

use crate::config::{load_config, ConfigError, SiteConfig};
use crate::state::SiteState;

/// Load the configuration file, or defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(SiteConfig::default()),
    }
}

/// Load and compile the site in one step.
pub fn load_site(path: Option<&Path>) -> Result<SiteState, ConfigError> {
    SiteState::build(load_or_default(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let site = load_site(None).unwrap();
        assert!(site.router.table().is_empty());
        assert!(!site.config.locales.multi_locale);
    }
}
