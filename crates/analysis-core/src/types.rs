use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Sentiment label attached to a news item by the NLP model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub label: SentimentLabel,
    /// Model confidence in [0, 1]. Display only.
    pub score: f64,
}

/// One news item with its sentiment classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentItem {
    pub text: String,
    pub signal: SentimentSignal,
}

/// News collection for one issuer as delivered by the analysis service.
///
/// The service answers either with a list of items or with an object
/// carrying an `error` field (no news in the lookback window).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum NewsPayload {
    Present(Vec<SentimentItem>),
    Absent(String),
}

impl NewsPayload {
    pub fn items(&self) -> &[SentimentItem] {
        match self {
            NewsPayload::Present(items) => items,
            NewsPayload::Absent(_) => &[],
        }
    }
}

impl<'de> Deserialize<'de> for NewsPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ErrorMarker {
            error: serde_json::Value,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Items(Vec<SentimentItem>),
            Error(ErrorMarker),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Items(items) => Ok(NewsPayload::Present(items)),
            Wire::Error(marker) => {
                let reason = match marker.error {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Ok(NewsPayload::Absent(reason))
            }
        }
    }
}

/// Categorical signal emitted by a single technical indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorSignal {
    Buy,
    Sell,
    Hold,
}

impl IndicatorSignal {
    /// Classify a raw wire value. Anything that is not exactly `Buy` or
    /// `Sell` falls into the Hold bucket.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Buy" => IndicatorSignal::Buy,
            "Sell" => IndicatorSignal::Sell,
            _ => IndicatorSignal::Hold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorSignal::Buy => "Buy",
            IndicatorSignal::Sell => "Sell",
            IndicatorSignal::Hold => "Hold",
        }
    }
}

impl std::fmt::Display for IndicatorSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of the technical indicator snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn key(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    pub fn all() -> [Timeframe; 3] {
        [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly]
    }
}

impl std::str::FromStr for Timeframe {
    type Err = crate::AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            other => Err(crate::AnalysisError::InvalidData(format!(
                "unknown timeframe: {}",
                other
            ))),
        }
    }
}

/// Technical indicator snapshot: timeframe key -> indicator name -> raw signal.
///
/// Values stay as strings so that an unexpected label is still counted
/// (as Hold) rather than failing the whole payload. The HTTP client decodes
/// non-string wire values into this form as well.
pub type TechnicalSnapshot = HashMap<String, BTreeMap<String, String>>;

/// One row of an issuer's trading history.
///
/// Numeric columns are kept exactly as the exchange publishes them
/// (locale formatted, e.g. `"1.234,56"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    #[serde(with = "crate::wire_date")]
    pub date: NaiveDate,
    pub last_trade_price: String,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub avg_price: Option<String>,
    #[serde(default)]
    pub percent_change: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub turnover_best: Option<String>,
    #[serde(default)]
    pub total_turnover: Option<String>,
}

/// LSTM forecast for one issuer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBundle {
    #[serde(with = "crate::wire_date::list")]
    pub recent_dates: Vec<NaiveDate>,
    pub actual_prices: Vec<f64>,
    #[serde(with = "crate::wire_date::list")]
    pub dates: Vec<NaiveDate>,
    pub predicted_prices: Vec<f64>,
    #[serde(default)]
    pub daily_percent: Vec<String>,
    pub signal: String,
}

/// Resolved recommendation for one analysis type.
///
/// A tie between several labels is kept as a slash-joined set
/// (e.g. `positive/neutral`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateSignal(pub String);

impl AggregateSignal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AggregateSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IndicatorSignal> for AggregateSignal {
    fn from(signal: IndicatorSignal) -> Self {
        AggregateSignal(signal.as_str().to_string())
    }
}
