use analysis_core::{ForecastBundle, NewsPayload, TechnicalSnapshot};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::ClientResult;
use crate::{build_http_client, get_json};

/// Technical indicator payload as sent by the analysis service.
///
/// Indicator values are not always strings (a resampled frame can yield
/// `null`, and some indicators come through as numbers). Every value is kept
/// as text so the vote counts it as Hold instead of rejecting the payload:
/// `null` becomes an empty string, other non-strings their JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicalPayload(pub TechnicalSnapshot);

impl TechnicalPayload {
    pub fn into_inner(self) -> TechnicalSnapshot {
        self.0
    }
}

fn signal_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl<'de> Deserialize<'de> for TechnicalPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
        let snapshot = raw
            .into_iter()
            .map(|(timeframe, signals)| {
                let signals = signals
                    .into_iter()
                    .map(|(indicator, value)| (indicator, signal_text(value)))
                    .collect();
                (timeframe, signals)
            })
            .collect();
        Ok(TechnicalPayload(snapshot))
    }
}

/// Client for the analysis service (technical, NLP and LSTM endpoints)
#[derive(Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: String, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    pub fn technical_url(&self, issuer: &str) -> String {
        format!("{}/api/technical/{}", self.base_url, issuer)
    }

    pub fn news_url(&self, issuer: &str) -> String {
        format!("{}/api/nlp/{}", self.base_url, issuer)
    }

    pub fn forecast_url(&self, issuer: &str) -> String {
        format!("{}/api/lstm/{}", self.base_url, issuer)
    }

    /// Indicator signals for every timeframe
    pub async fn technical(&self, issuer: &str) -> ClientResult<TechnicalSnapshot> {
        let payload: TechnicalPayload = get_json(&self.client, &self.technical_url(issuer)).await?;
        Ok(payload.into_inner())
    }

    /// Sentiment-labeled news from the lookback window
    pub async fn news(&self, issuer: &str) -> ClientResult<NewsPayload> {
        get_json(&self.client, &self.news_url(issuer)).await
    }

    /// LSTM price forecast
    pub async fn forecast(&self, issuer: &str) -> ClientResult<ForecastBundle> {
        get_json(&self.client, &self.forecast_url(issuer)).await
    }
}
