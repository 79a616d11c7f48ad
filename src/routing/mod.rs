//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteDefinition[] (configuration order)
//!     → compiler.rs (placeholders → regex, optional /{locale} prefix)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path, cookie, Accept-Language)
//!     → context.rs (normalize into segments)
//!     → router.rs
//!         locale-independent routes
//!         → services prefix
//!         → locale negotiation
//!     → Return: RouteMatch | Redirect | ServicesForward | NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always yields the same decision
//! - First match wins (configuration order, never sorted)

pub mod compiler;
pub mod context;
pub mod router;

pub use compiler::{CompiledRoute, RouteError, RouteScope, RouteTable, LOCALE_PARAMETER};
pub use context::RequestContext;
pub use router::{Decision, MalformedServiceRequest, RouteMatch, Router, ServiceCall};
