//! BrasilAPI provider (`/api/cep/v1/{cep}`).

use async_trait::async_trait;

use crate::config::schema::ProviderConfig;
use crate::lookup::provider::{decode_document, AddressProvider, ProviderClient};
use crate::lookup::types::{AddressRecord, BrasilApiAddress, LookupError};

pub struct BrasilApiProvider {
    client: ProviderClient,
}

impl BrasilApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ProviderClient::new(config)?,
        })
    }

    fn path(code: &str) -> String {
        format!("/api/cep/v1/{}", code)
    }
}

#[async_trait]
impl AddressProvider for BrasilApiProvider {
    fn name(&self) -> &str {
        self.client.name()
    }

    async fn fetch(&self, code: &str) -> Result<AddressRecord, LookupError> {
        let document = self.client.get_json(&Self::path(code)).await?;
        let address: BrasilApiAddress = decode_document(self.name(), document)?;
        Ok(address.into())
    }
}
