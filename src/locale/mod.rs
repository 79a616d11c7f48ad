//! Locale subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     LocaleConfig (explicit list or data directory)
//!     → catalog.rs (ordered set of locale codes)
//!     → data.rs (one JSON data file per code, page metas)
//!
//! Per request (multi-locale only):
//!     first path segment, cookie, Accept-Language
//!     → negotiator.rs
//!     → Direct(code) | Preferred { code, source }
//! ```

pub mod catalog;
pub mod data;
pub mod negotiator;

pub use catalog::LocaleCatalog;
pub use data::LocaleData;
pub use negotiator::{
    is_locale_code, negotiate, split_code, LocaleSignals, Negotiated, PreferenceSource,
};
