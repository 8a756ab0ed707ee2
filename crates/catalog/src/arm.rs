//! Live catalog backed by the ARM providers endpoint

use provisioning_generator_common::{
    CatalogConfig, GeneratorError, ResourceCatalog, ResourceTypeVersions, Result,
};
use serde::Deserialize;
use std::env;
use tracing::debug;

/// Body of `GET /subscriptions/{sub}/providers/{namespace}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderResponse {
    #[serde(default)]
    resource_types: Vec<ResourceTypeVersions>,
}

/// Queries `{endpoint}/subscriptions/{sub}/providers/{namespace}` with a
/// bearer token; one request per namespace, no retries
pub struct ArmCatalog {
    client: reqwest::blocking::Client,
    endpoint: String,
    subscription_id: String,
    api_version: String,
    token: String,
}

impl ArmCatalog {
    pub fn new(
        endpoint: impl Into<String>,
        subscription_id: impl Into<String>,
        api_version: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            subscription_id: subscription_id.into(),
            api_version: api_version.into(),
            token: token.into(),
        }
    }

    /// Build from configuration, reading the token from `token_env`
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let subscription_id = config.subscription_id.clone().ok_or_else(|| {
            GeneratorError::Config(
                "catalog.subscription_id is required for the arm catalog".to_string(),
            )
        })?;
        let token = env::var(&config.token_env).map_err(|_| {
            GeneratorError::Config(format!(
                "Environment variable {} must hold an access token for the arm catalog",
                config.token_env
            ))
        })?;

        Ok(Self::new(
            config.endpoint.clone(),
            subscription_id,
            config.api_version.clone(),
            token,
        ))
    }

    /// URL of the provider lookup for a namespace
    pub fn provider_url(&self, namespace: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/{}?api-version={}",
            self.endpoint, self.subscription_id, namespace, self.api_version
        )
    }
}

impl ResourceCatalog for ArmCatalog {
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>> {
        let url = self.provider_url(namespace);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| GeneratorError::Catalog(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            GeneratorError::Catalog(format!("Failed to read response from {}: {}", url, e))
        })?;

        if !status.is_success() {
            return Err(GeneratorError::Catalog(format!(
                "Provider lookup for {} returned {}: {}",
                namespace, status, body
            )));
        }

        parse_provider_response(&body)
    }
}

fn parse_provider_response(body: &str) -> Result<Vec<ResourceTypeVersions>> {
    let response: ProviderResponse = serde_json::from_str(body)?;
    Ok(response.resource_types)
}
