//! Built-in `site` service: read-only facts about the deployment.

use serde_json::{json, Value};

use crate::locale::split_code;
use crate::services::{Service, ServiceContext, ServiceError};

pub struct SiteService;

impl Service for SiteService {
    fn name(&self) -> &str {
        "site"
    }

    fn methods(&self) -> &[&'static str] {
        &["locales", "locale", "version"]
    }

    fn call(
        &self,
        method: &str,
        _parameter: Option<&str>,
        ctx: &ServiceContext<'_>,
    ) -> Result<Option<Value>, ServiceError> {
        match method {
            "locales" => Ok(Some(json!({
                "multi": ctx.locales.multi_locale,
                "default": ctx.locales.default_locale,
                "available": ctx.catalog.list(),
            }))),
            "locale" => Ok(ctx.locale.map(|code| {
                let (language, country) = split_code(code, &ctx.locales.separator);
                json!({ "code": code, "language": language, "country": country })
            })),
            "version" => Ok(Some(json!({ "version": ctx.site.version }))),
            other => Err(ServiceError::UnknownMethod {
                service: self.name().to_string(),
                method: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LocaleConfig, SiteSettings};
    use crate::locale::LocaleCatalog;

    #[test]
    fn test_site_methods() {
        let catalog = LocaleCatalog::new(["en-gb", "fr-fr"]);
        let locales = LocaleConfig {
            multi_locale: true,
            default_locale: "en-gb".into(),
            ..LocaleConfig::default()
        };
        let site = SiteSettings::default();
        let mut ctx = ServiceContext {
            locale: None,
            catalog: &catalog,
            locales: &locales,
            site: &site,
        };

        let locales_json = SiteService.call("locales", None, &ctx).unwrap().unwrap();
        assert_eq!(locales_json["available"], json!(["en-gb", "fr-fr"]));
        assert_eq!(locales_json["default"], "en-gb");

        assert_eq!(SiteService.call("locale", None, &ctx), Ok(None));
        ctx.locale = Some("fr-fr");
        assert_eq!(
            SiteService.call("locale", None, &ctx),
            Ok(Some(json!({ "code": "fr-fr", "language": "fr", "country": "fr" })))
        );

        let version = SiteService.call("version", None, &ctx).unwrap().unwrap();
        assert_eq!(version["version"], site.version);
    }
}
