//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! site.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → SiteState::build compiles routes and the locale catalog
//!     → shared via Arc to every request
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → SiteState::build recompiles
//!     → atomic swap of Arc<SiteState>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Route order in the file is route precedence

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, LocaleConfig, ObservabilityConfig, RouteDefinition, SecurityConfig,
    SiteConfig, SiteSettings, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
