//! Once-per-day gate in front of the remote scrape trigger.
//!
//! The last day a scrape was triggered is kept as an ISO date string under a
//! single key. The gate compares it with today's date (exact string match)
//! and only calls the trigger when they differ.

pub mod error;
pub mod store;

pub use error::{GateError, GateResult};
pub use store::{FileMarkerStore, MarkerStore, MemoryMarkerStore};

use chrono::NaiveDate;
use std::future::Future;
use std::path::PathBuf;

/// Key the marker is stored under
pub const MARKER_KEY: &str = "lastScrapedDate";

/// Format of the stored marker
pub const MARKER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Configuration for the gate
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub marker_key: String,
    /// Marker file, `None` keeps the marker in memory only
    pub marker_path: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        let marker_path = std::env::var("DASHBOARD_MARKER_PATH")
            .ok()
            .map(PathBuf::from)
            .or_else(|| FileMarkerStore::default_path().ok());

        Self {
            marker_key: MARKER_KEY.to_string(),
            marker_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No scrape has been triggered today
    Stale,
    /// Today's scrape already ran
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    AlreadyFresh,
    Triggered,
}

pub struct FreshnessGate<C: Clock, S: MarkerStore> {
    clock: C,
    store: S,
    marker_key: String,
}

impl<C: Clock, S: MarkerStore> FreshnessGate<C, S> {
    pub fn new(clock: C, store: S) -> Self {
        Self {
            clock,
            store,
            marker_key: MARKER_KEY.to_string(),
        }
    }

    pub fn with_marker_key(mut self, key: impl Into<String>) -> Self {
        self.marker_key = key.into();
        self
    }

    fn today_marker(&self) -> String {
        self.clock.today().format(MARKER_DATE_FORMAT).to_string()
    }

    /// Last marker written, if any
    pub fn marker(&self) -> GateResult<Option<String>> {
        self.store.get(&self.marker_key)
    }

    /// Marker as the gate sees it. An unreadable store counts as no marker.
    fn stored_marker(&self) -> Option<String> {
        match self.marker() {
            Ok(marker) => marker,
            Err(e) => {
                tracing::warn!("Scrape marker unreadable, treating data as stale: {}", e);
                None
            }
        }
    }

    pub fn check(&self) -> Freshness {
        let today = self.today_marker();
        match self.stored_marker() {
            Some(marker) if marker == today => Freshness::Fresh,
            _ => Freshness::Stale,
        }
    }

    /// Run `trigger` unless today's scrape already happened.
    ///
    /// The marker is written only after the trigger succeeds. A failed
    /// trigger leaves the marker untouched and is returned to the caller
    /// without retrying.
    pub async fn ensure_fresh<F, Fut, E>(&self, trigger: F) -> GateResult<GateOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        let today = self.today_marker();
        let marker = self.stored_marker();

        if marker.as_deref() == Some(today.as_str()) {
            tracing::debug!("Scrape already triggered on {}, skipping", today);
            return Ok(GateOutcome::AlreadyFresh);
        }

        tracing::info!(
            "Data is stale (last scrape: {}), triggering scrape",
            marker.as_deref().unwrap_or("never")
        );

        if let Err(e) = trigger().await {
            tracing::warn!("Scrape trigger failed: {}", e);
            return Err(GateError::Trigger(e.to_string()));
        }

        if let Err(e) = self.store.set(&self.marker_key, &today) {
            // Scrape already ran; the next activation triggers again
            tracing::warn!("Failed to persist scrape marker: {}", e);
        }

        Ok(GateOutcome::Triggered)
    }
}
