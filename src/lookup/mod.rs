//! Upstream address providers.
//!
//! # Data Flow
//! ```text
//! postal code
//!     → provider.rs (build URL, GET, read body, parse JSON)
//!     → via_cep.rs / brasil_api.rs (decode native schema)
//!     → AddressRecord variant, or LookupError
//! ```
//!
//! # Design Decisions
//! - Each provider owns its own HTTP client and per-call timeout
//! - Records keep the provider's schema; nothing is normalized here
//! - Non-2xx statuses count as transport failures

pub mod brasil_api;
pub mod provider;
pub mod types;
pub mod via_cep;

pub use brasil_api::BrasilApiProvider;
pub use provider::{build_providers, AddressProvider, ProviderClient};
pub use types::{
    AddressRecord, BrasilApiAddress, FailureKind, LookupError, ResolutionOutcome, ViaCepAddress,
};
pub use via_cep::ViaCepProvider;
