//! Compiled, request-ready site state.

use crate::config::{validate_config, ConfigError, SiteConfig};
use crate::locale::{is_locale_code, LocaleCatalog, LocaleData};
use crate::routing::{RouteTable, Router};

/// Everything a request needs, built once per configuration.
///
/// Never mutated after [`SiteState::build`]; a reload builds a new value and
/// swaps it in whole.
#[derive(Debug)]
pub struct SiteState {
    pub config: SiteConfig,
    pub router: Router,
    /// Content data for every catalog entry.
    pub locale_data: LocaleData,
}

impl SiteState {
    /// Validate the configuration, compile routes and load the locale catalog.
    ///
    /// Any error here is a startup error; nothing is deferred to requests.
    pub fn build(config: SiteConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let table = RouteTable::compile(&config.routes, &config.locales)?;
        let catalog = LocaleCatalog::from_config(&config.locales)?;

        let locales = &config.locales;
        if locales.multi_locale {
            for code in catalog.iter().chain([locales.default_locale.as_str()]) {
                if !is_locale_code(code, &locales.separator) || code != code.to_lowercase() {
                    return Err(ConfigError::InvalidLocaleCode {
                        code: code.to_string(),
                        separator: locales.separator.clone(),
                    });
                }
            }
            if !catalog.contains(&locales.default_locale) {
                return Err(ConfigError::UnknownDefaultLocale(
                    locales.default_locale.clone(),
                ));
            }
        }

        let locale_data = LocaleData::load(&locales.data_dir, &catalog)?;

        tracing::debug!(
            routes = table.len(),
            locales = catalog.len(),
            multi_locale = locales.multi_locale,
            "Site state compiled"
        );

        let router = Router::new(table, catalog, locales.clone(), config.site.base.clone());
        Ok(Self {
            config,
            router,
            locale_data,
        })
    }
}
