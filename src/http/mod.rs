//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing::Router::resolve (decision)
//!     → page.rs (route match → renderer)
//!     → services registry (service call → JSON)
//!     → response.rs (redirects, errors, service results)
//!     → Send to client
//! ```

pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use page::{JsonPageRenderer, PageRenderer, PageView};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
