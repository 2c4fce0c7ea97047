//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → resolver built from it, shared via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in a freshly built resolver
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults, so an empty file is a working config
//! - Validation separates syntactic (serde) from semantic checks
//! - The bind address is read once at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    LogFormat, ListenerConfig, ObservabilityConfig, ProviderConfig, ProviderKind, ResolverConfig,
    ServiceConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
