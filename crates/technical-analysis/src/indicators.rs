use serde::{Deserialize, Serialize};

/// Presentation family an indicator is listed under.
///
/// The family has no influence on the aggregate vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorFamily {
    MovingAverage,
    Oscillator,
}

impl IndicatorFamily {
    pub fn title(&self) -> &'static str {
        match self {
            IndicatorFamily::MovingAverage => "Moving Averages",
            IndicatorFamily::Oscillator => "Oscillators",
        }
    }
}

/// Trend-following indicators, in display order
pub const MOVING_AVERAGES: [&str; 5] = [
    "SMA_20_Signal",
    "EMA_20_Signal",
    "WMA_20_Signal",
    "TRIX_Signal",
    "MACD_Signal",
];

/// Momentum oscillators, in display order
pub const OSCILLATORS: [&str; 6] = [
    "PPO_Signal",
    "RSI_Signal",
    "Stoch_%K_Signal",
    "Williams_R_Signal",
    "ROC_Signal",
    "CCI_Signal",
];

pub const INDICATOR_COUNT: usize = MOVING_AVERAGES.len() + OSCILLATORS.len();

/// Indicator keys belonging to a family
pub fn family_members(family: IndicatorFamily) -> &'static [&'static str] {
    match family {
        IndicatorFamily::MovingAverage => &MOVING_AVERAGES,
        IndicatorFamily::Oscillator => &OSCILLATORS,
    }
}

/// Family of a known indicator key, `None` for anything outside the catalogue
pub fn family_of(indicator: &str) -> Option<IndicatorFamily> {
    if MOVING_AVERAGES.contains(&indicator) {
        Some(IndicatorFamily::MovingAverage)
    } else if OSCILLATORS.contains(&indicator) {
        Some(IndicatorFamily::Oscillator)
    } else {
        None
    }
}

/// Table label for an indicator key: drop the `_Signal` suffix and turn the
/// first underscore into a space (`SMA_20_Signal` -> `SMA 20`).
pub fn display_name(indicator: &str) -> String {
    indicator.replacen("_Signal", "", 1).replacen('_', " ", 1)
}
