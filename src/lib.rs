//! Locale-aware front controller for a marketing site.
//!
//! Maps request paths to content routes, negotiates the visitor's locale
//! and decides between serving a page, redirecting, or forwarding to a
//! backend service.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod locale;
pub mod observability;
pub mod routing;
pub mod services;
pub mod state;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Decision, Router};
pub use state::SiteState;
