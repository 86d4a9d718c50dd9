use crate::config::PartnersConfig;
use crate::domain::model::QueryRequest;
use crate::domain::ports::GraphqlTransport;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// `GraphqlTransport` over HTTPS. One client, reused for every page of every
/// stream.
#[derive(Debug, Clone)]
pub struct PartnersClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PartnersClient {
    pub fn new(config: &PartnersConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &PartnersConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphqlTransport for PartnersClient {
    async fn post(&self, request: &QueryRequest) -> Result<serde_json::Value> {
        tracing::debug!("📡 POST {} (after: {:?})", self.endpoint, request.variables.after);

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
