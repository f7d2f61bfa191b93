pub mod analysis;
pub mod error;
pub mod market;
pub mod provider;

pub use analysis::{AnalysisClient, TechnicalPayload};
pub use error::{ClientError, ClientResult};
pub use market::{MarketDataClient, PriceHistory};
pub use provider::{AnalysisProvider, HttpProvider};

use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the backend services
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Price history and scrape trigger service
    pub market_url: String,
    /// Technical / NLP / LSTM analysis service
    pub analysis_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_secs = std::env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            market_url: std::env::var("MARKET_URL").unwrap_or_else(|_| backend_url.clone()),
            analysis_url: std::env::var("ANALYSIS_URL").unwrap_or(backend_url),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Complete backend client with both services
#[derive(Clone)]
pub struct BackendClient {
    pub market: MarketDataClient,
    pub analysis: AnalysisClient,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let market_url = config.market_url.trim_end_matches('/').to_string();
        let analysis_url = config.analysis_url.trim_end_matches('/').to_string();
        Ok(Self {
            market: MarketDataClient::new(market_url, config.timeout)?,
            analysis: AnalysisClient::new(analysis_url, config.timeout)?,
        })
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// GET `url` and decode a JSON body, mapping non-2xx statuses to
/// `ClientError::Status`
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> ClientResult<T> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        tracing::warn!("{} returned {}", url, status);
        return Err(ClientError::from_status(status));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
