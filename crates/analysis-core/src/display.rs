use serde::{Deserialize, Serialize};

/// Colour family a signal badge is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalTone {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalTone {
    pub fn classify(signal: &str) -> Self {
        match signal.to_lowercase().as_str() {
            "buy" | "positive" => SignalTone::Bullish,
            "sell" | "negative" => SignalTone::Bearish,
            _ => SignalTone::Neutral,
        }
    }
}

/// Normalise any aggregate signal to the Buy/Sell/Hold vocabulary used in
/// the signal header.
///
/// Sentiment labels are mapped (`neutral` -> Hold, `negative` -> Sell,
/// `positive` -> Buy, first occurrence each) and the result is capitalised
/// sentence style, so a tie `positive/neutral` reads `Buy/hold`.
pub fn display_signal(signal: &str) -> String {
    let mapped = signal
        .to_lowercase()
        .replacen("neutral", "Hold", 1)
        .replacen("negative", "Sell", 1)
        .replacen("positive", "Buy", 1);

    let mut chars = mapped.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Model confidence as shown next to a news item, e.g. `0.8734` -> `87.3%`.
///
/// Exact ties at the second decimal round away from zero (`0.25` -> `0.3`).
pub fn format_score_percent(score: f64) -> String {
    let tenths = (score * 100.0 * 10.0).abs();
    let floor = tenths.floor();
    let rounded = if tenths - floor >= 0.5 { floor + 1.0 } else { floor };
    let sign = if score < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{}{:.1}%", sign, rounded / 10.0)
}
