use analysis_core::PricePoint;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::{build_http_client, get_json};

/// Trading history rows in the order the service sent them.
///
/// Accepts both a JSON array and an object keyed by opaque row id; for the
/// keyed form the row ids are dropped and document order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceHistory(pub Vec<PricePoint>);

impl PriceHistory {
    pub fn into_inner(self) -> Vec<PricePoint> {
        self.0
    }
}

impl<'de> Deserialize<'de> for PriceHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowsVisitor;

        impl<'de> Visitor<'de> for RowsVisitor {
            type Value = PriceHistory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of price rows or a map of row id to price row")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(PriceHistory::default())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(row) = seq.next_element::<PricePoint>()? {
                    rows.push(row);
                }
                Ok(PriceHistory(rows))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, row)) = map.next_entry::<serde::de::IgnoredAny, PricePoint>()? {
                    rows.push(row);
                }
                Ok(PriceHistory(rows))
            }
        }

        deserializer.deserialize_any(RowsVisitor)
    }
}

/// Client for the price-history and scrape-trigger service
#[derive(Clone)]
pub struct MarketDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(base_url: String, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    pub fn scrape_url(&self) -> String {
        format!("{}/api/fill-data", self.base_url)
    }

    pub fn issuers_url(&self) -> String {
        format!("{}/api/issuers", self.base_url)
    }

    pub fn issuer_data_url(&self, issuer: &str) -> String {
        format!("{}/api/issuer-data/{}", self.base_url, issuer)
    }

    /// Ask the service to scrape the exchange. Only success matters.
    pub async fn trigger_scrape(&self) -> ClientResult<()> {
        let response = self.client.get(self.scrape_url()).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::from_status(response.status()));
        }
        Ok(())
    }

    /// All issuer codes known to the service
    pub async fn issuers(&self) -> ClientResult<Vec<String>> {
        get_json(&self.client, &self.issuers_url()).await
    }

    /// Full trading history of one issuer, unsorted
    pub async fn issuer_data(&self, issuer: &str) -> ClientResult<Vec<PricePoint>> {
        let history: PriceHistory = get_json(&self.client, &self.issuer_data_url(issuer)).await?;
        Ok(history.into_inner())
    }
}
