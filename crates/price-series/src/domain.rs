use serde::{Deserialize, Serialize};

/// Fraction of the value range added on each side of the history chart
pub const HISTORY_PADDING: f64 = 0.1;

/// Lower bound scale of the forecast chart (2% margin)
pub const FORECAST_LOWER_SCALE: f64 = 0.98;

/// Upper bound scale of the forecast chart (2% margin)
pub const FORECAST_UPPER_SCALE: f64 = 1.02;

/// Forecast bounds snap to multiples of this step
pub const FORECAST_ROUNDING_STEP: f64 = 100.0;

/// Y-axis bounds for a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub lower: f64,
    pub upper: f64,
}

fn min_max<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Half-up rounding to the nearest integer (`2.5` -> `3`, `-2.5` -> `-2`)
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// History chart domain: pad both ends by 10% of the value range.
///
/// A flat series yields `[min, max]` with no padding; an empty one `None`.
pub fn padded_domain<I: IntoIterator<Item = f64>>(values: I) -> Option<ValueDomain> {
    let (min, max) = min_max(values)?;
    let range = max - min;
    Some(ValueDomain {
        lower: min - range * HISTORY_PADDING,
        upper: max + range * HISTORY_PADDING,
    })
}

/// Forecast chart domain: floor the extremes, widen them by 2% and snap
/// each bound to the nearest multiple of 100.
pub fn rounded_domain<I: IntoIterator<Item = f64>>(values: I) -> Option<ValueDomain> {
    let (min, max) = min_max(values)?;
    let lo = min.floor();
    let hi = max.floor();
    Some(ValueDomain {
        lower: round_half_up(lo * FORECAST_LOWER_SCALE / FORECAST_ROUNDING_STEP)
            * FORECAST_ROUNDING_STEP,
        upper: round_half_up(hi * FORECAST_UPPER_SCALE / FORECAST_ROUNDING_STEP)
            * FORECAST_ROUNDING_STEP,
    })
}
