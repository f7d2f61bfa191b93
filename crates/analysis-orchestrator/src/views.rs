use analysis_core::display::{display_signal, SignalTone};
use analysis_core::{AnalysisError, TechnicalSnapshot, Timeframe};
use fundamental_analysis::FundamentalReport;
use freshness_gate::GateOutcome;
use price_series::{ForecastChart, PriceChart, PriceRow};
use serde::{Deserialize, Serialize};
use technical_analysis::{TechnicalAnalysisEngine, TechnicalReport};

pub const NO_ISSUER_MESSAGE: &str = "No issuer selected";
pub const NO_PRICE_DATA_MESSAGE: &str = "No data available for this issuer.";
pub const ANALYSIS_FETCH_FAILED_MESSAGE: &str = "Failed to fetch analysis data";
pub const NO_FORECAST_MESSAGE: &str = "There is not enough data for the LSTM Analysis to be done";

/// Display state of one dashboard section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState<T> {
    Ready { data: T },
    Empty { message: String },
    Failed { message: String },
}

impl<T> ViewState<T> {
    pub fn ready(data: T) -> Self {
        ViewState::Ready { data }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        ViewState::Empty {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ViewState::Failed {
            message: message.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready { data } => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Ready { .. } => None,
            ViewState::Empty { message } | ViewState::Failed { message } => Some(message),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed { .. })
    }
}

/// Result of the once-per-day scrape gate for this activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeStatus {
    AlreadyFresh,
    Triggered,
    Failed { message: String },
}

impl From<GateOutcome> for ScrapeStatus {
    fn from(outcome: GateOutcome) -> Self {
        match outcome {
            GateOutcome::AlreadyFresh => ScrapeStatus::AlreadyFresh,
            GateOutcome::Triggered => ScrapeStatus::Triggered,
        }
    }
}

/// Aggregate signal as shown above each analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHeader {
    pub raw: String,
    pub value: String,
    pub tone: SignalTone,
}

impl SignalHeader {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            value: display_signal(raw),
            tone: SignalTone::classify(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeView {
    pub scrape: ScrapeStatus,
    pub issuers: ViewState<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSection {
    pub chart: PriceChart,
    pub table: Vec<PriceRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSection {
    pub header: Option<SignalHeader>,
    pub report: ViewState<TechnicalReport>,
    snapshot: TechnicalSnapshot,
}

impl TechnicalSection {
    pub fn build(engine: &TechnicalAnalysisEngine, snapshot: TechnicalSnapshot, timeframe: Timeframe) -> Self {
        let report = match engine.analyze(&snapshot, timeframe) {
            Ok(report) => ViewState::ready(report),
            Err(AnalysisError::InsufficientData(msg)) => ViewState::empty(msg),
            Err(e) => ViewState::failed(e.to_string()),
        };
        let header = report.data().map(|r| SignalHeader::new(r.signal.as_str()));
        Self {
            header,
            report,
            snapshot,
        }
    }

    /// Re-run the vote for another timeframe without refetching
    pub fn select_timeframe(&self, engine: &TechnicalAnalysisEngine, timeframe: Timeframe) -> Self {
        Self::build(engine, self.snapshot.clone(), timeframe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSection {
    pub header: Option<SignalHeader>,
    pub report: FundamentalReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmSection {
    pub header: SignalHeader,
    pub chart: ViewState<ForecastChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysesSection {
    pub technical: TechnicalSection,
    pub fundamental: FundamentalSection,
    pub lstm: LstmSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsView {
    pub issuer: Option<String>,
    pub scrape: Option<ScrapeStatus>,
    pub prices: ViewState<PriceSection>,
    pub analyses: ViewState<AnalysesSection>,
}
