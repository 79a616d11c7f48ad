//! Service dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Decision::ServicesForward { service, method, extra }
//!     → registry.rs (lookup by validated name)
//!     → Service::call(method, extra, context)
//!     → Some(json) → 200 application/json
//!     → None       → 204
//!     → Err(e)     → JSON error body with a stable code
//! ```
//!
//! # Design Decisions
//! - Handlers are registered explicitly at startup; nothing is loaded by
//!   a name taken from the request
//! - Method names match case-insensitively
//! - Business services live outside this crate and plug in through `Service`

pub mod registry;
pub mod site;

use serde_json::Value;
use thiserror::Error;

use crate::config::{LocaleConfig, SiteSettings};
use crate::locale::LocaleCatalog;

pub use registry::ServiceRegistry;
pub use site::SiteService;

/// Failure while dispatching a service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service name `{0}` is not alphanumeric")]
    InvalidName(String),

    #[error("service `{0}` is not registered")]
    UnknownService(String),

    #[error("service `{0}` is unavailable")]
    Unavailable(String),

    #[error("service `{service}` has no method `{method}`")]
    UnknownMethod { service: String, method: String },

    #[error("service call failed: {0}")]
    Failed(String),
}

impl ServiceError {
    /// Stable error code reported to clients.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidName(_) => 1,
            Self::UnknownService(_) => 2,
            Self::Unavailable(_) => 3,
            Self::UnknownMethod { .. } => 4,
            Self::Failed(_) => 5,
        }
    }
}

/// Request-scoped data handed to a service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceContext<'a> {
    /// Locale requested through `?locale=`, only set when it is in the catalog.
    pub locale: Option<&'a str>,
    pub catalog: &'a LocaleCatalog,
    pub locales: &'a LocaleConfig,
    pub site: &'a SiteSettings,
}

/// A backend service reachable under the services prefix.
pub trait Service: Send + Sync {
    /// Lower-case alphanumeric name used in the URL.
    fn name(&self) -> &str;

    /// Methods this service answers, matched case-insensitively.
    fn methods(&self) -> &[&'static str];

    /// Invoke `method`. `Ok(None)` means "nothing to return".
    fn call(
        &self,
        method: &str,
        parameter: Option<&str>,
        ctx: &ServiceContext<'_>,
    ) -> Result<Option<Value>, ServiceError>;
}
