//! Provider abstraction and the shared HTTP fetch path.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::{ProviderConfig, ProviderKind};
use crate::lookup::brasil_api::BrasilApiProvider;
use crate::lookup::types::{AddressRecord, LookupError};
use crate::lookup::via_cep::ViaCepProvider;

/// A single upstream address-lookup service.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Look up `code` and decode the provider's native document.
    async fn fetch(&self, code: &str) -> Result<AddressRecord, LookupError>;
}

/// HTTP plumbing shared by the concrete providers.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl ProviderClient {
    /// Build a client with the per-call timeout from `config`.
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            name: config.display_name().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute URL for `path` on this provider.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path`, read the whole body and parse it as JSON.
    ///
    /// Connection failures, non-2xx statuses and unreadable bodies are
    /// transport errors; a body that is not JSON is a decode error.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, LookupError> {
        let url = self.url(path);
        tracing::trace!(provider = %self.name, url = %url, "Querying provider");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "{} answered with status {}",
                self.name, status
            )));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| LookupError::Decode(format!("{}: {}", self.name, e)))
    }
}

/// Decode a parsed document into the provider's schema.
pub(crate) fn decode_document<T: serde::de::DeserializeOwned>(
    provider: &str,
    document: serde_json::Value,
) -> Result<T, LookupError> {
    serde_json::from_value(document).map_err(|e| LookupError::Decode(format!("{}: {}", provider, e)))
}

/// Instantiate every configured provider.
pub fn build_providers(
    configs: &[ProviderConfig],
) -> Result<Vec<Arc<dyn AddressProvider>>, reqwest::Error> {
    configs
        .iter()
        .map(|config| {
            let provider: Arc<dyn AddressProvider> = match config.kind {
                ProviderKind::ViaCep => Arc::new(ViaCepProvider::new(config)?),
                ProviderKind::BrasilApi => Arc::new(BrasilApiProvider::new(config)?),
            };
            Ok(provider)
        })
        .collect()
}
