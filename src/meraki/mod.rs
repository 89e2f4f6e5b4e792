pub mod requests;
pub mod status;

use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Dashboard API v1
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the Meraki Dashboard API
#[derive(Debug, Clone)]
pub struct MerakiClient {
    base_url: String,
    api_key: SecretString,
    client: Client,
}

impl MerakiClient {
    pub fn new(api_key: SecretString) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: SecretString, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<String> {
        let url = Url::parse(&self.base_url)?;

        if url.host().is_none() {
            return Err(anyhow!("Error parsing URL: no host specified"));
        }

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        }

        let endpoint_url = format!("{}{}", self.base_url, endpoint);

        debug!("endpoint URL: {}", endpoint);

        Ok(endpoint_url)
    }

    /// GET with the static API key header; independent 30s timeout per call
    pub(crate) async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let url = self.endpoint_url(endpoint)?;

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        Ok(response)
    }
}
