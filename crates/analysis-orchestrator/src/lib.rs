use analysis_core::{ForecastBundle, NewsPayload, PricePoint, TechnicalSnapshot, Timeframe};
use backend_client::{AnalysisProvider, ClientResult};
use freshness_gate::{Clock, FreshnessGate, MarkerStore};
use fundamental_analysis::{FundamentalAnalysisEngine, FundamentalOutcome};
use price_series::{forecast_chart, price_chart, price_table, MAX_CHART_POINTS};
use std::sync::Arc;
use technical_analysis::TechnicalAnalysisEngine;

pub mod views;
pub use views::*;

/// Drives one dashboard activation: the daily scrape gate, then the issuer's
/// price history and the three analyses, reduced to display-ready views.
pub struct DashboardOrchestrator<C: Clock, S: MarkerStore> {
    provider: Arc<dyn AnalysisProvider>,
    gate: FreshnessGate<C, S>,
    technical_analyzer: TechnicalAnalysisEngine,
    fundamental_analyzer: FundamentalAnalysisEngine,
    max_chart_points: usize,
}

impl<C: Clock, S: MarkerStore> DashboardOrchestrator<C, S> {
    pub fn new(provider: Arc<dyn AnalysisProvider>, gate: FreshnessGate<C, S>) -> Self {
        Self {
            provider,
            gate,
            technical_analyzer: TechnicalAnalysisEngine::new(),
            fundamental_analyzer: FundamentalAnalysisEngine::new(),
            max_chart_points: MAX_CHART_POINTS,
        }
    }

    pub fn with_max_chart_points(mut self, max_points: usize) -> Self {
        self.max_chart_points = max_points;
        self
    }

    /// Public accessor for the technical engine (timeframe re-selection)
    pub fn technical_engine(&self) -> &TechnicalAnalysisEngine {
        &self.technical_analyzer
    }

    /// Query the gate once and trigger today's scrape if it has not run yet.
    /// A failed trigger is reported, never retried.
    pub async fn refresh(&self) -> ScrapeStatus {
        let provider = Arc::clone(&self.provider);
        match self.gate.ensure_fresh(|| async move { provider.trigger_scrape().await }).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                tracing::warn!("Scrape gate failed: {}", e);
                ScrapeStatus::Failed {
                    message: match e {
                        freshness_gate::GateError::Trigger(msg) => msg,
                        other => other.to_string(),
                    },
                }
            }
        }
    }

    /// Landing page: scrape gate, then the issuer list for the search box
    pub async fn activate_home(&self) -> HomeView {
        let scrape = self.refresh().await;

        let issuers = match self.provider.issuers().await {
            Ok(issuers) => ViewState::ready(issuers),
            Err(e) => {
                tracing::error!("Failed to fetch issuer list: {}", e);
                ViewState::failed(e.user_message())
            }
        };

        HomeView { scrape, issuers }
    }

    /// Issuer details page.
    ///
    /// The scrape gate completes before any issuer data is requested. Price
    /// history and analyses are then loaded side by side; each section fails
    /// on its own.
    pub async fn activate_details(&self, issuer: Option<&str>, timeframe: Timeframe) -> DetailsView {
        let Some(issuer) = issuer.filter(|i| !i.trim().is_empty()) else {
            return DetailsView {
                issuer: None,
                scrape: None,
                prices: ViewState::failed(NO_ISSUER_MESSAGE),
                analyses: ViewState::failed(NO_ISSUER_MESSAGE),
            };
        };

        tracing::info!("Loading details for {} (timeframe: {})", issuer, timeframe.key());

        let scrape = self.refresh().await;

        let (prices, analyses) = tokio::join!(
            self.load_prices(issuer),
            self.load_analyses(issuer, timeframe),
        );

        DetailsView {
            issuer: Some(issuer.to_string()),
            scrape: Some(scrape),
            prices,
            analyses,
        }
    }

    /// Issuer price history as a bounded chart plus the newest-first table
    pub async fn load_prices(&self, issuer: &str) -> ViewState<PriceSection> {
        match self.provider.issuer_data(issuer).await {
            Ok(rows) => self.build_price_section(&rows),
            Err(e) => {
                tracing::error!("Error fetching issuer data for {}: {}", issuer, e);
                ViewState::failed(e.user_message())
            }
        }
    }

    fn build_price_section(&self, rows: &[PricePoint]) -> ViewState<PriceSection> {
        if rows.is_empty() {
            return ViewState::empty(NO_PRICE_DATA_MESSAGE);
        }
        let chart = price_chart(rows, self.max_chart_points);
        tracing::debug!(
            "Price chart: {} of {} rows kept (stride {})",
            chart.points.len(),
            chart.source_len,
            chart.stride
        );
        ViewState::ready(PriceSection {
            chart,
            table: price_table(rows),
        })
    }

    /// Fetch technical, news and forecast payloads concurrently.
    ///
    /// Fails fast: the first error drops the other in-flight requests and
    /// none of the three analyses is shown.
    pub async fn fetch_analyses(
        &self,
        issuer: &str,
    ) -> ClientResult<(TechnicalSnapshot, NewsPayload, ForecastBundle)> {
        tokio::try_join!(
            self.provider.technical(issuer),
            self.provider.news(issuer),
            self.provider.forecast(issuer),
        )
    }

    pub async fn load_analyses(&self, issuer: &str, timeframe: Timeframe) -> ViewState<AnalysesSection> {
        match self.fetch_analyses(issuer).await {
            Ok((snapshot, news, forecast)) => {
                ViewState::ready(self.build_analyses(snapshot, &news, &forecast, timeframe))
            }
            Err(e) => {
                tracing::error!("Failed to fetch analysis data for {}: {}", issuer, e);
                ViewState::failed(ANALYSIS_FETCH_FAILED_MESSAGE)
            }
        }
    }

    /// Reduce already-fetched payloads to the three analysis views
    pub fn build_analyses(
        &self,
        snapshot: TechnicalSnapshot,
        news: &NewsPayload,
        forecast: &ForecastBundle,
        timeframe: Timeframe,
    ) -> AnalysesSection {
        let technical = TechnicalSection::build(&self.technical_analyzer, snapshot, timeframe);

        let report = self.fundamental_analyzer.analyze(news);
        let header = match &report.outcome {
            FundamentalOutcome::Signal { signal } => Some(SignalHeader::new(signal.as_str())),
            FundamentalOutcome::InsufficientData { reason } => {
                tracing::info!("Fundamental analysis skipped: {}", reason);
                None
            }
        };
        let fundamental = FundamentalSection { header, report };

        let chart = forecast_chart(forecast);
        let lstm = LstmSection {
            header: SignalHeader::new(&chart.signal),
            chart: if chart.is_empty() {
                ViewState::empty(NO_FORECAST_MESSAGE)
            } else {
                ViewState::ready(chart)
            },
        };

        AnalysesSection {
            technical,
            fundamental,
            lstm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{SentimentItem, SentimentLabel, SentimentSignal};
    use async_trait::async_trait;
    use backend_client::ClientError;
    use chrono::NaiveDate;
    use freshness_gate::{FixedClock, MemoryMarkerStore, MARKER_KEY};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn status_error(code: u16) -> ClientError {
        ClientError::Status {
            code,
            reason: "Internal Server Error".to_string(),
        }
    }

    /// In-memory backend recording the order of calls
    #[derive(Default)]
    struct FakeProvider {
        calls: Mutex<Vec<&'static str>>,
        fail_scrape: bool,
        fail_news: bool,
        fail_prices: bool,
        slow_forecast: bool,
        rows: Vec<PricePoint>,
        news: Option<NewsPayload>,
    }

    impl FakeProvider {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn snapshot() -> TechnicalSnapshot {
        let mut daily = BTreeMap::new();
        for (i, key) in technical_analysis::MOVING_AVERAGES
            .iter()
            .chain(technical_analysis::OSCILLATORS.iter())
            .enumerate()
        {
            let value = if i < 5 { "Buy" } else if i < 9 { "Sell" } else { "Hold" };
            daily.insert(key.to_string(), value.to_string());
        }
        let mut snapshot = TechnicalSnapshot::new();
        snapshot.insert("daily".to_string(), daily);
        snapshot
    }

    fn bundle() -> ForecastBundle {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        ForecastBundle {
            recent_dates: vec![d(1), d(2)],
            actual_prices: vec![980.0, 1000.0],
            dates: vec![d(3)],
            predicted_prices: vec![2150.4],
            daily_percent: vec!["Day 1: +1.2%".to_string()],
            signal: "Buy".to_string(),
        }
    }

    fn rows(n: usize) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                last_trade_price: format!("{}.{:03},00", 1 + i / 1000, i % 1000),
                max_price: None,
                min_price: None,
                avg_price: None,
                percent_change: None,
                volume: None,
                turnover_best: None,
                total_turnover: None,
            })
            .collect()
    }

    #[async_trait]
    impl AnalysisProvider for FakeProvider {
        async fn trigger_scrape(&self) -> ClientResult<()> {
            self.record("scrape");
            if self.fail_scrape {
                return Err(status_error(500));
            }
            Ok(())
        }

        async fn issuers(&self) -> ClientResult<Vec<String>> {
            self.record("issuers");
            Ok(vec!["ALK".to_string(), "KMB".to_string()])
        }

        async fn issuer_data(&self, _issuer: &str) -> ClientResult<Vec<PricePoint>> {
            self.record("issuer_data");
            if self.fail_prices {
                return Err(status_error(500));
            }
            Ok(self.rows.clone())
        }

        async fn technical(&self, _issuer: &str) -> ClientResult<TechnicalSnapshot> {
            self.record("technical");
            Ok(snapshot())
        }

        async fn news(&self, _issuer: &str) -> ClientResult<NewsPayload> {
            self.record("news");
            if self.fail_news {
                return Err(status_error(502));
            }
            Ok(self.news.clone().unwrap_or_else(|| {
                NewsPayload::Present(vec![SentimentItem {
                    text: "Record quarter".to_string(),
                    signal: SentimentSignal {
                        label: SentimentLabel::Positive,
                        score: 0.93,
                    },
                }])
            }))
        }

        async fn forecast(&self, _issuer: &str) -> ClientResult<ForecastBundle> {
            if self.slow_forecast {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            self.record("forecast");
            Ok(bundle())
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn orchestrator(
        provider: Arc<FakeProvider>,
        marker: Option<&str>,
    ) -> DashboardOrchestrator<FixedClock, MemoryMarkerStore> {
        let store = match marker {
            Some(m) => MemoryMarkerStore::with_value(MARKER_KEY, m),
            None => MemoryMarkerStore::new(),
        };
        let gate = FreshnessGate::new(FixedClock(today()), store);
        DashboardOrchestrator::new(provider, gate)
    }

    #[tokio::test]
    async fn test_stale_gate_triggers_before_issuer_fetch() {
        let provider = Arc::new(FakeProvider {
            rows: rows(100),
            ..Default::default()
        });
        let orch = orchestrator(provider.clone(), None);

        let view = orch.activate_details(Some("ALK"), Timeframe::Daily).await;

        assert_eq!(view.scrape, Some(ScrapeStatus::Triggered));
        let calls = provider.calls();
        assert_eq!(calls[0], "scrape");
        assert!(calls.contains(&"issuer_data"));

        let prices = view.prices.data().unwrap();
        assert_eq!(prices.chart.points.len(), 50);
        assert_eq!(prices.table.len(), 100);
        assert_eq!(prices.table[0].date, "09.04.2024");
    }

    #[tokio::test]
    async fn test_fresh_gate_skips_trigger() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider.clone(), Some("2024-01-01"));

        let view = orch.activate_details(Some("ALK"), Timeframe::Daily).await;

        assert_eq!(view.scrape, Some(ScrapeStatus::AlreadyFresh));
        assert!(!provider.calls().contains(&"scrape"));
    }

    #[tokio::test]
    async fn test_failed_trigger_still_loads_data() {
        let provider = Arc::new(FakeProvider {
            fail_scrape: true,
            rows: rows(3),
            ..Default::default()
        });
        let orch = orchestrator(provider.clone(), Some("2023-12-31"));

        let view = orch.activate_details(Some("ALK"), Timeframe::Daily).await;

        match view.scrape {
            Some(ScrapeStatus::Failed { message }) => {
                assert_eq!(message, "Error: 500 - Internal Server Error")
            }
            other => panic!("unexpected scrape status: {:?}", other),
        }
        assert!(view.prices.data().is_some());
        assert_eq!(provider.calls()[0], "scrape");
        // Marker untouched, the next activation tries again
        assert!(matches!(orch.refresh().await, ScrapeStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_one_failed_analysis_fails_all_three() {
        let provider = Arc::new(FakeProvider {
            fail_news: true,
            rows: rows(3),
            ..Default::default()
        });
        let orch = orchestrator(provider, Some("2024-01-01"));

        let view = orch.activate_details(Some("ALK"), Timeframe::Daily).await;

        assert_eq!(view.analyses, ViewState::failed(ANALYSIS_FETCH_FAILED_MESSAGE));
        assert!(view.prices.data().is_some());
    }

    #[tokio::test]
    async fn test_first_failure_cancels_pending_fetches() {
        let provider = Arc::new(FakeProvider {
            fail_news: true,
            slow_forecast: true,
            ..Default::default()
        });
        let orch = orchestrator(provider.clone(), Some("2024-01-01"));

        let result = tokio::time::timeout(Duration::from_secs(5), orch.fetch_analyses("ALK"))
            .await
            .expect("fetch should fail fast instead of waiting on the forecast");

        assert!(result.is_err());
        assert!(!provider.calls().contains(&"forecast"));
    }

    #[tokio::test]
    async fn test_analyses_are_aggregated() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider, Some("2024-01-01"));

        let view = orch.load_analyses("ALK", Timeframe::Daily).await;
        let analyses = view.data().unwrap();

        // 5 Buy, 4 Sell, 2 Hold
        let technical = analyses.technical.report.data().unwrap();
        assert_eq!(technical.signal.as_str(), "Buy");
        assert_eq!(analyses.technical.header.as_ref().unwrap().value, "Buy");

        let fundamental = analyses.fundamental.header.as_ref().unwrap();
        assert_eq!(fundamental.raw, "positive");
        assert_eq!(fundamental.value, "Buy");

        let chart = analyses.lstm.chart.data().unwrap();
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.points[2].predicted, Some(2150.0));
        let domain = chart.domain.unwrap();
        assert!((domain.lower - 1000.0).abs() < 1e-9);
        assert!((domain.upper - 2200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_timeframe_and_reselection() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider, Some("2024-01-01"));

        let view = orch.load_analyses("ALK", Timeframe::Weekly).await;
        let analyses = view.data().unwrap();
        assert!(matches!(analyses.technical.report, ViewState::Empty { .. }));
        assert!(analyses.technical.header.is_none());

        let daily = analyses
            .technical
            .select_timeframe(orch.technical_engine(), Timeframe::Daily);
        assert_eq!(daily.report.data().unwrap().signal.as_str(), "Buy");
    }

    #[test]
    fn test_null_indicator_value_still_aggregates() {
        let json = r#"{"daily": {
            "SMA_20_Signal": "Buy", "EMA_20_Signal": "Buy", "WMA_20_Signal": "Buy",
            "TRIX_Signal": null, "MACD_Signal": null, "RSI_Signal": "Sell"
        }}"#;
        let snapshot = serde_json::from_str::<backend_client::TechnicalPayload>(json)
            .unwrap()
            .into_inner();
        let orch = orchestrator(Arc::new(FakeProvider::default()), Some("2024-01-01"));

        let news = NewsPayload::Absent(String::new());
        let analyses = orch.build_analyses(snapshot, &news, &bundle(), Timeframe::Daily);
        let report = analyses.technical.report.data().unwrap();
        // 3 Buy, 1 Sell, 2 Hold (the nulls)
        assert_eq!(report.counts.hold, 2);
        assert_eq!(report.signal.as_str(), "Buy");
    }

    #[tokio::test]
    async fn test_news_error_marker_is_insufficient_data() {
        let provider = Arc::new(FakeProvider {
            news: Some(NewsPayload::Absent("No news in the past 20 days".to_string())),
            ..Default::default()
        });
        let orch = orchestrator(provider, Some("2024-01-01"));

        let view = orch.load_analyses("ALK", Timeframe::Daily).await;
        let fundamental = &view.data().unwrap().fundamental;
        assert!(fundamental.header.is_none());
        assert!(matches!(
            fundamental.report.outcome,
            FundamentalOutcome::InsufficientData { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_history_is_no_data() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider, Some("2024-01-01"));

        let prices = orch.load_prices("ALK").await;
        assert_eq!(prices, ViewState::empty(NO_PRICE_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn test_price_fetch_failure() {
        let provider = Arc::new(FakeProvider {
            fail_prices: true,
            ..Default::default()
        });
        let orch = orchestrator(provider, Some("2024-01-01"));

        let prices = orch.load_prices("ALK").await;
        assert_eq!(prices.message(), Some("Error: 500 - Internal Server Error"));
    }

    #[tokio::test]
    async fn test_no_issuer_selected() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider.clone(), None);

        let view = orch.activate_details(None, Timeframe::Daily).await;
        assert_eq!(view.prices.message(), Some(NO_ISSUER_MESSAGE));
        assert!(view.scrape.is_none());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_home_activation() {
        let provider = Arc::new(FakeProvider::default());
        let orch = orchestrator(provider.clone(), None);

        let home = orch.activate_home().await;
        assert_eq!(home.scrape, ScrapeStatus::Triggered);
        assert_eq!(home.issuers.data().unwrap().len(), 2);
        assert_eq!(provider.calls(), vec!["scrape", "issuers"]);

        // Second activation the same day does not trigger again
        let home = orch.activate_home().await;
        assert_eq!(home.scrape, ScrapeStatus::AlreadyFresh);
    }
}
