//! ViaCEP provider (`/ws/{cep}/json`).

use async_trait::async_trait;

use crate::config::schema::ProviderConfig;
use crate::lookup::provider::{decode_document, AddressProvider, ProviderClient};
use crate::lookup::types::{AddressRecord, LookupError, ViaCepAddress};

pub struct ViaCepProvider {
    client: ProviderClient,
}

impl ViaCepProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ProviderClient::new(config)?,
        })
    }

    fn path(code: &str) -> String {
        format!("/ws/{}/json", code)
    }
}

#[async_trait]
impl AddressProvider for ViaCepProvider {
    fn name(&self) -> &str {
        self.client.name()
    }

    async fn fetch(&self, code: &str) -> Result<AddressRecord, LookupError> {
        let document = self.client.get_json(&Self::path(code)).await?;

        // Unknown codes come back as 200 with an `erro` marker instead of an address.
        if document.get("erro").is_some() {
            return Err(LookupError::Decode(format!(
                "{}: no address for postal code {}",
                self.name(),
                code
            )));
        }

        let address: ViaCepAddress = decode_document(self.name(), document)?;
        Ok(address.into())
    }
}
