//! Client for the Stock Query Service, as seen from the order side.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use microshop_core::Sku;
use microshop_inventory::AvailabilityResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryClientError {
    #[error("inventory service did not answer within the timeout")]
    Timeout,
    #[error("inventory service unreachable: {0}")]
    Transport(String),
    #[error("inventory service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("inventory service response could not be decoded: {0}")]
    Decode(String),
    #[error("inventory client misconfigured: {0}")]
    Setup(String),
}

impl InventoryClientError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Remote availability lookup. One call, no retries, no caching.
#[async_trait::async_trait]
pub trait InventoryClient: Send + Sync {
    async fn query_availability(&self, codes: &BTreeSet<Sku>) -> Result<Vec<AvailabilityResult>, InventoryClientError>;
}

#[async_trait::async_trait]
impl<C> InventoryClient for Arc<C>
where
    C: InventoryClient + ?Sized,
{
    async fn query_availability(&self, codes: &BTreeSet<Sku>) -> Result<Vec<AvailabilityResult>, InventoryClientError> {
        (**self).query_availability(codes).await
    }
}

/// HTTP client for `GET {base_url}/api/inventory?skuCode=..&skuCode=..`.
///
/// The whole exchange (connect, send, read body) is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, InventoryClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryClientError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/inventory", base_url.as_ref().trim_end_matches('/')),
        })
    }
}

#[async_trait::async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn query_availability(&self, codes: &BTreeSet<Sku>) -> Result<Vec<AvailabilityResult>, InventoryClientError> {
        let query: Vec<(&str, &str)> = codes.iter().map(|c| ("skuCode", c.as_str())).collect();

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(InventoryClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(InventoryClientError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        resp.json::<Vec<AvailabilityResult>>()
            .await
            .map_err(InventoryClientError::from_reqwest)
    }
}
