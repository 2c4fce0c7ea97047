//! Address documents and lookup errors.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Address document as returned by ViaCEP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViaCepAddress {
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    /// State abbreviation. Older ViaCEP mirrors omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
}

/// Address document as returned by BrasilAPI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BrasilApiAddress {
    pub cep: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub street: String,
    /// Upstream service BrasilAPI itself used to answer.
    #[serde(default)]
    pub service: String,
}

/// Whichever provider document won the race.
///
/// Serializes as the provider's native document, without a wrapping tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AddressRecord {
    ViaCep(ViaCepAddress),
    BrasilApi(BrasilApiAddress),
}

impl AddressRecord {
    /// Postal code as echoed by the provider.
    pub fn postal_code(&self) -> &str {
        match self {
            AddressRecord::ViaCep(a) => &a.cep,
            AddressRecord::BrasilApi(a) => &a.cep,
        }
    }

    /// Short label of the provider schema this record follows.
    pub fn source(&self) -> &'static str {
        match self {
            AddressRecord::ViaCep(_) => "viacep",
            AddressRecord::BrasilApi(_) => "brasilapi",
        }
    }
}

impl From<ViaCepAddress> for AddressRecord {
    fn from(address: ViaCepAddress) -> Self {
        AddressRecord::ViaCep(address)
    }
}

impl From<BrasilApiAddress> for AddressRecord {
    fn from(address: BrasilApiAddress) -> Self {
        AddressRecord::BrasilApi(address)
    }
}

/// Coarse classification of a [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transport,
    Decode,
    Timeout,
    NoProviders,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Decode => "decode",
            FailureKind::Timeout => "timeout",
            FailureKind::NoProviders => "no_providers",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can end an address lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection, DNS, IO or upstream status failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the provider schema.
    #[error("decode error: {0}")]
    Decode(String),

    /// No provider answered within the resolution budget.
    #[error("no provider answered within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The resolver has nothing to race.
    #[error("no address providers configured")]
    NoProviders,
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::Transport(_) => FailureKind::Transport,
            LookupError::Decode(_) => FailureKind::Decode,
            LookupError::Timeout(_) => FailureKind::Timeout,
            LookupError::NoProviders => FailureKind::NoProviders,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Transport(e.to_string())
    }
}

/// Outcome of one resolution.
pub type ResolutionOutcome = Result<AddressRecord, LookupError>;
