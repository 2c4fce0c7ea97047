//! HTTP adapter subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → handlers.rs (extract postal code, reject empty)
//!     → AddressResolver (race providers)
//!     → 200 JSON record | 400 | 404
//! ```
//!
//! # Design Decisions
//! - The resolver knows nothing about HTTP; status mapping lives here
//! - Failure reasons are logged, never exposed in the response body

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
