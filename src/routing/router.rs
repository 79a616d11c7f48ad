//! Route lookup and dispatch decision.
//!
//! # Responsibilities
//! - Normalize the request path
//! - Match locale-independent routes before any negotiation
//! - Detect the services prefix and validate service paths
//! - Negotiate the locale and choose between serving and redirecting
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure: a decision is a value, headers and cookies are the caller's job
//! - O(n) linear scan in configuration order, first match wins
//! - Explicit NotFound rather than silent default

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::LocaleConfig;
use crate::locale::{negotiate, LocaleCatalog, LocaleSignals, Negotiated, PreferenceSource};
use crate::routing::compiler::{CompiledRoute, RouteScope, RouteTable};
use crate::routing::context::RequestContext;

/// A request for the service dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCall {
    /// Lower-cased, alphanumeric service name.
    pub service: String,
    /// Method name as sent by the client.
    pub method: String,
    /// Optional single argument taken from the fourth segment.
    pub extra: Option<String>,
}

/// A fully matched content route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub route: Arc<CompiledRoute>,
    /// Locale served, `None` in single-locale deployments.
    pub locale: Option<String>,
    /// Parameter name/value pairs in capture order, locale first when present.
    pub parameters: Vec<(String, String)>,
    /// Normalized request path the route matched.
    pub path: String,
}

impl RouteMatch {
    /// Value bound to a named parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parameter values in capture order.
    pub fn values(&self) -> Vec<&str> {
        self.parameters.iter().map(|(_, v)| v.as_str()).collect()
    }
}

/// What to do with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    ServicesForward(ServiceCall),
    RouteMatch(RouteMatch),
    Redirect {
        destination: String,
        locale: String,
        source: PreferenceSource,
    },
    /// No route matched. `locale` is set when the path named a known locale.
    NotFound { locale: Option<String> },
}

impl Decision {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServicesForward(_) => "services_forward",
            Self::RouteMatch(_) => "route_match",
            Self::Redirect { .. } => "redirect",
            Self::NotFound { .. } => "not_found",
        }
    }
}

/// A services-prefixed path that must not reach service dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedServiceRequest {
    #[error("service request needs a service and a method segment")]
    MissingMethod,

    #[error("service name `{0}` is not alphanumeric")]
    InvalidServiceName(String),
}

impl MalformedServiceRequest {
    /// Stable error code reported to clients.
    pub fn code(&self) -> u16 {
        match self {
            Self::MissingMethod => 0,
            Self::InvalidServiceName(_) => 1,
        }
    }
}

/// Resolves request paths against the compiled route table.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    catalog: LocaleCatalog,
    locales: LocaleConfig,
    base: String,
}

impl Router {
    /// Create a router. `base` prefixes every redirect destination.
    pub fn new(
        table: RouteTable,
        catalog: LocaleCatalog,
        locales: LocaleConfig,
        base: impl Into<String>,
    ) -> Self {
        Self {
            table,
            catalog,
            locales,
            base: base.into(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    pub fn locale_config(&self) -> &LocaleConfig {
        &self.locales
    }

    /// Decide what to do with `raw_path`.
    pub fn resolve(
        &self,
        raw_path: &str,
        signals: &LocaleSignals<'_>,
    ) -> Result<Decision, MalformedServiceRequest> {
        let ctx = RequestContext::new(raw_path);
        let candidate = ctx.candidate();
        let multi = self.locales.multi_locale;

        if multi {
            if let Some(matched) = self.match_route(&candidate, RouteScope::LocaleIndependent, None)
            {
                return Ok(Decision::RouteMatch(matched));
            }
        }

        if ctx.first_segment() == self.locales.services_prefix {
            return service_call(&ctx).map(Decision::ServicesForward);
        }

        if !multi {
            return Ok(self
                .match_route(&candidate, RouteScope::All, None)
                .map_or(Decision::NotFound { locale: None }, Decision::RouteMatch));
        }

        match negotiate(ctx.first_segment(), signals, &self.catalog, &self.locales) {
            Negotiated::Direct(code) => Ok(self
                .match_route(&candidate, RouteScope::All, Some(code.clone()))
                .map_or(Decision::NotFound { locale: Some(code) }, Decision::RouteMatch)),
            Negotiated::Preferred { code, source } => {
                tracing::trace!(locale = %code, source = source.as_str(), "Locale preference selected");
                Ok(Decision::Redirect {
                    destination: format!("{}{}/", self.base, code),
                    locale: code,
                    source,
                })
            }
        }
    }

    fn match_route(
        &self,
        candidate: &str,
        scope: RouteScope,
        locale: Option<String>,
    ) -> Option<RouteMatch> {
        let (route, values) = self.table.find(candidate, scope)?;
        let parameters = route.parameters().iter().cloned().zip(values).collect();
        Some(RouteMatch {
            route,
            locale,
            parameters,
            path: candidate.to_string(),
        })
    }
}

fn service_call(ctx: &RequestContext) -> Result<ServiceCall, MalformedServiceRequest> {
    let raw = ctx.raw_segments();
    let (Some(service), Some(method)) = (raw.get(1), raw.get(2)) else {
        return Err(MalformedServiceRequest::MissingMethod);
    };
    if method.is_empty() {
        return Err(MalformedServiceRequest::MissingMethod);
    }

    let service = service.to_lowercase();
    if service.is_empty() || !service.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MalformedServiceRequest::InvalidServiceName(service));
    }

    Ok(ServiceCall {
        service,
        method: method.clone(),
        extra: raw.get(3).cloned(),
    })
}
