use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::{DashboardConfig, Endpoints};
use crate::model::CombinedData;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("building HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the two dashboard payloads come from.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Collateral snapshot and core asset metrics.
    async fn combined(&self) -> Result<CombinedData, FetchError>;

    /// Raw pool records, undecoded so each can be validated on its own.
    async fn pools(&self) -> Result<Vec<Value>, FetchError>;
}

/// Reads both payloads over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpSource {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(DashboardConfig::user_agent())
            .build()?;
        Ok(HttpSource {
            client,
            endpoints: config.endpoints.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url.clone()).send().await.map_err(http)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(http)?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DashboardSource for HttpSource {
    async fn combined(&self) -> Result<CombinedData, FetchError> {
        self.get_json(&self.endpoints.core_url).await
    }

    async fn pools(&self) -> Result<Vec<Value>, FetchError> {
        self.get_json(&self.endpoints.pools_url).await
    }
}
