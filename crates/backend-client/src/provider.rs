use analysis_core::{ForecastBundle, NewsPayload, PricePoint, TechnicalSnapshot};
use async_trait::async_trait;

use crate::error::ClientResult;
use crate::BackendClient;

/// Backend-agnostic access to the dashboard's remote data.
///
/// Implemented by the HTTP client; tests substitute in-memory fakes.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    // -- Market data ---------------------------------------------------------
    async fn trigger_scrape(&self) -> ClientResult<()>;

    async fn issuers(&self) -> ClientResult<Vec<String>>;

    async fn issuer_data(&self, issuer: &str) -> ClientResult<Vec<PricePoint>>;

    // -- Analyses ------------------------------------------------------------
    async fn technical(&self, issuer: &str) -> ClientResult<TechnicalSnapshot>;

    async fn news(&self, issuer: &str) -> ClientResult<NewsPayload>;

    async fn forecast(&self, issuer: &str) -> ClientResult<ForecastBundle>;

    // -- Meta ----------------------------------------------------------------
    fn backend_name(&self) -> &'static str;
}

/// HTTP-backed implementation that delegates to `BackendClient`
pub struct HttpProvider {
    client: BackendClient,
}

impl HttpProvider {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl From<BackendClient> for HttpProvider {
    fn from(client: BackendClient) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl AnalysisProvider for HttpProvider {
    async fn trigger_scrape(&self) -> ClientResult<()> {
        self.client.market.trigger_scrape().await
    }

    async fn issuers(&self) -> ClientResult<Vec<String>> {
        self.client.market.issuers().await
    }

    async fn issuer_data(&self, issuer: &str) -> ClientResult<Vec<PricePoint>> {
        self.client.market.issuer_data(issuer).await
    }

    async fn technical(&self, issuer: &str) -> ClientResult<TechnicalSnapshot> {
        self.client.analysis.technical(issuer).await
    }

    async fn news(&self, issuer: &str) -> ClientResult<NewsPayload> {
        self.client.analysis.news(issuer).await
    }

    async fn forecast(&self, issuer: &str) -> ClientResult<ForecastBundle> {
        self.client.analysis.forecast(issuer).await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
