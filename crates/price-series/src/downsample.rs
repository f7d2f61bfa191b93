use analysis_core::PricePoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{padded_domain, ValueDomain};
use crate::locale::parse_locale_number;

/// Upper bound on the number of points drawn on the history chart
pub const MAX_CHART_POINTS: usize = 40;

/// Positional stride that keeps at most roughly `max_points` entries.
///
/// Never below 1, so short series are kept whole rather than upsampled.
pub fn stride_for(len: usize, max_points: usize) -> usize {
    if max_points == 0 {
        return 1;
    }
    (len / max_points).max(1)
}

/// Keep every stride-th element starting at index 0
pub fn downsample<T: Clone>(points: &[T], max_points: usize) -> Vec<T> {
    let stride = stride_for(points.len(), max_points);
    points.iter().step_by(stride).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub last_price: f64,
}

/// History chart data: bounded, chronologically ordered points and the
/// padded y-axis domain over them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub points: Vec<ChartPoint>,
    pub domain: Option<ValueDomain>,
    pub stride: usize,
    pub source_len: usize,
}

impl PriceChart {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the history chart from an issuer's raw trading rows.
///
/// Rows are ordered by date first since the source does not guarantee it.
/// Last trade prices that cannot be parsed are left out of the chart.
pub fn price_chart(rows: &[PricePoint], max_points: usize) -> PriceChart {
    let mut ordered: Vec<&PricePoint> = rows.iter().collect();
    ordered.sort_by_key(|row| row.date);

    let stride = stride_for(ordered.len(), max_points);
    let points: Vec<ChartPoint> = ordered
        .iter()
        .step_by(stride)
        .filter_map(|row| {
            parse_locale_number(&row.last_trade_price).map(|last_price| ChartPoint {
                date: row.date,
                last_price,
            })
        })
        .collect();

    let domain = padded_domain(points.iter().map(|p| p.last_price));

    PriceChart {
        points,
        domain,
        stride,
        source_len: rows.len(),
    }
}
