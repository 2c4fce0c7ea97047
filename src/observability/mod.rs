//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (cep, provider, kind)
//!     → logging.rs installs the subscriber (pretty or JSON on stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging only; no metrics exporter
//! - Request ID flows through the HTTP trace span
//! - RUST_LOG overrides the configured level

pub mod logging;

pub use logging::init_logging;
