//! Postal-code address resolver library.
//!
//! Races independent CEP lookup services and returns whichever answers first.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod resolver;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use lookup::{AddressProvider, AddressRecord, LookupError};
pub use resolver::{AddressResolver, RacePolicy};
