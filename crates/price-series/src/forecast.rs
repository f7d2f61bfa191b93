use analysis_core::ForecastBundle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{round_half_up, rounded_domain, ValueDomain};

/// One x-axis position on the forecast chart. Exactly one of the two
/// values is present for entries built by [`merge_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastChart {
    pub points: Vec<ForecastPoint>,
    pub domain: Option<ValueDomain>,
    pub daily_percent: Vec<String>,
    pub signal: String,
}

impl ForecastChart {
    /// No chart can be drawn, the view shows a "not enough data" notice instead
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Concatenate observed prices and forecast prices into one series.
///
/// Each input keeps its own order and observed entries come first; no
/// sorting happens across the two. Predicted values are rounded to whole
/// units, actual values are kept as is. Dates and values are zipped, so a
/// length mismatch truncates to the shorter side.
pub fn merge_series(
    recent_dates: &[NaiveDate],
    actual_prices: &[f64],
    forecast_dates: &[NaiveDate],
    predicted_prices: &[f64],
) -> Vec<ForecastPoint> {
    let observed = recent_dates
        .iter()
        .zip(actual_prices)
        .map(|(date, price)| ForecastPoint {
            date: *date,
            actual: Some(*price),
            predicted: None,
        });

    let forecast = forecast_dates
        .iter()
        .zip(predicted_prices)
        .map(|(date, price)| ForecastPoint {
            date: *date,
            actual: None,
            predicted: Some(round_half_up(*price)),
        });

    observed.chain(forecast).collect()
}

/// Values that take part in the forecast domain
pub fn present_values(points: &[ForecastPoint]) -> impl Iterator<Item = f64> + '_ {
    points
        .iter()
        .flat_map(|p| p.actual.into_iter().chain(p.predicted))
}

/// Build the forecast chart from an LSTM bundle
pub fn forecast_chart(bundle: &ForecastBundle) -> ForecastChart {
    let points = merge_series(
        &bundle.recent_dates,
        &bundle.actual_prices,
        &bundle.dates,
        &bundle.predicted_prices,
    );
    let domain = rounded_domain(present_values(&points));

    ForecastChart {
        points,
        domain,
        daily_percent: bundle.daily_percent.clone(),
        signal: bundle.signal.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bundle() -> ForecastBundle {
        ForecastBundle {
            recent_dates: vec![date(1), date(2), date(3)],
            actual_prices: vec![980.0, 1000.25, 1010.5],
            dates: vec![date(4), date(5)],
            predicted_prices: vec![2020.4, 2150.5],
            daily_percent: vec!["Day 1: +0.5%".to_string(), "Day 2: +0.7%".to_string()],
            signal: "Buy".to_string(),
        }
    }

    #[test]
    fn test_merge_order_and_rounding() {
        let b = bundle();
        let points = merge_series(&b.recent_dates, &b.actual_prices, &b.dates, &b.predicted_prices);

        assert_eq!(points.len(), 5);
        assert_eq!(points[0].date, date(1));
        assert_eq!(points[1].actual, Some(1000.25));
        assert_eq!(points[1].predicted, None);
        assert_eq!(points[3].actual, None);
        assert_eq!(points[3].predicted, Some(2020.0));
        assert_eq!(points[4].predicted, Some(2151.0));
    }

    #[test]
    fn test_merge_does_not_sort_across_series() {
        // Forecast dated before the observations stays after them
        let points = merge_series(&[date(10)], &[5.0], &[date(1)], &[6.0]);
        assert_eq!(points[0].date, date(10));
        assert_eq!(points[1].date, date(1));
    }

    #[test]
    fn test_merge_length_mismatch_truncates() {
        let points = merge_series(&[date(1), date(2)], &[1.0], &[], &[]);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_forecast_chart_domain() {
        let chart = forecast_chart(&bundle());
        // floor -> [980, 2151], scaled -> [960.4, 2194.02], snapped -> [1000, 2200]
        let domain = chart.domain.unwrap();
        assert!((domain.lower - 1000.0).abs() < 1e-9);
        assert!((domain.upper - 2200.0).abs() < 1e-9);
        assert_eq!(chart.signal, "Buy");
        assert_eq!(chart.daily_percent.len(), 2);
    }

    #[test]
    fn test_forecast_chart_empty_bundle() {
        let chart = forecast_chart(&ForecastBundle {
            recent_dates: vec![],
            actual_prices: vec![],
            dates: vec![],
            predicted_prices: vec![],
            daily_percent: vec![],
            signal: "Hold".to_string(),
        });
        assert!(chart.is_empty());
        assert!(chart.domain.is_none());
    }

    #[test]
    fn test_zero_actual_price_still_counts() {
        let points = merge_series(&[date(1)], &[0.0], &[date(2)], &[150.0]);
        let values: Vec<f64> = present_values(&points).collect();
        assert_eq!(values, vec![0.0, 150.0]);
    }
}
