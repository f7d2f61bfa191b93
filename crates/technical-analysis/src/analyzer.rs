use analysis_core::{AggregateSignal, AnalysisError, IndicatorSignal, TechnicalSnapshot, Timeframe};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::indicators::*;

/// Per-category tally of one timeframe's indicator signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

impl SignalCounts {
    /// Tally raw values. Anything that is not `Buy` or `Sell` counts as Hold.
    pub fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = SignalCounts::default();
        for value in values {
            match IndicatorSignal::from_raw(value) {
                IndicatorSignal::Buy => counts.buy += 1,
                IndicatorSignal::Sell => counts.sell += 1,
                IndicatorSignal::Hold => counts.hold += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.buy + self.sell + self.hold
    }
}

/// Three-way vote with Hold as the fallback.
///
/// Buy or Sell only win with a count strictly above both other buckets.
/// Every other outcome, including a Buy/Sell tie, resolves to Hold.
pub fn three_way_vote(counts: SignalCounts) -> IndicatorSignal {
    if counts.buy > counts.sell && counts.buy > counts.hold {
        IndicatorSignal::Buy
    } else if counts.sell > counts.buy && counts.sell > counts.hold {
        IndicatorSignal::Sell
    } else {
        IndicatorSignal::Hold
    }
}

/// One indicator row in a family table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub indicator: String,
    pub label: String,
    /// Raw value as delivered, `None` if the indicator is missing from the payload
    pub signal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    pub family: IndicatorFamily,
    pub title: String,
    pub rows: Vec<IndicatorRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub timeframe: Timeframe,
    pub signal: AggregateSignal,
    pub counts: SignalCounts,
    pub tables: Vec<IndicatorTable>,
    pub reason: String,
    pub metrics: serde_json::Value,
}

pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    fn timeframe_signals<'a>(
        &self,
        snapshot: &'a TechnicalSnapshot,
        timeframe: Timeframe,
    ) -> Result<&'a BTreeMap<String, String>, AnalysisError> {
        snapshot.get(timeframe.key()).ok_or_else(|| {
            AnalysisError::InsufficientData(format!(
                "No {} indicator signals available",
                timeframe.key()
            ))
        })
    }

    /// Aggregate signal for the selected timeframe.
    ///
    /// Every value in the timeframe takes part in the vote, whatever family
    /// it belongs to.
    pub fn aggregate(
        &self,
        snapshot: &TechnicalSnapshot,
        timeframe: Timeframe,
    ) -> Result<IndicatorSignal, AnalysisError> {
        let signals = self.timeframe_signals(snapshot, timeframe)?;
        let counts = SignalCounts::tally(signals.values().map(String::as_str));
        Ok(three_way_vote(counts))
    }

    /// Aggregate plus the family tables shown next to it
    pub fn analyze(
        &self,
        snapshot: &TechnicalSnapshot,
        timeframe: Timeframe,
    ) -> Result<TechnicalReport, AnalysisError> {
        let signals = self.timeframe_signals(snapshot, timeframe)?;
        let counts = SignalCounts::tally(signals.values().map(String::as_str));
        let signal = three_way_vote(counts);

        let tables = [IndicatorFamily::MovingAverage, IndicatorFamily::Oscillator]
            .into_iter()
            .map(|family| IndicatorTable {
                family,
                title: family.title().to_string(),
                rows: family_members(family)
                    .iter()
                    .map(|key| IndicatorRow {
                        indicator: key.to_string(),
                        label: display_name(key),
                        signal: signals.get(*key).cloned(),
                    })
                    .collect(),
            })
            .collect();

        let uncatalogued: Vec<&str> = signals
            .keys()
            .map(String::as_str)
            .filter(|k| family_of(k).is_none())
            .collect();

        let reason = format!(
            "{} on {} timeframe ({} buy, {} sell, {} hold of {} indicators)",
            signal,
            timeframe.key(),
            counts.buy,
            counts.sell,
            counts.hold,
            counts.total()
        );

        let metrics = json!({
            "buy_count": counts.buy,
            "sell_count": counts.sell,
            "hold_count": counts.hold,
            "indicator_count": counts.total(),
            "expected_indicator_count": INDICATOR_COUNT,
            "uncatalogued_indicators": uncatalogued,
        });

        Ok(TechnicalReport {
            timeframe,
            signal: signal.into(),
            counts,
            tables,
            reason,
            metrics,
        })
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
