use analysis_core::display::format_score_percent;
use analysis_core::vote::{join_labels, majority_labels};
use analysis_core::{AggregateSignal, NewsPayload, SentimentItem, SentimentLabel};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Separator used to render a tie between sentiment labels
pub const TIE_SEPARATOR: &str = "/";

/// Result of aggregating an issuer's news sentiment.
///
/// `InsufficientData` is a terminal display state of its own and is never
/// folded into a neutral/Hold signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FundamentalOutcome {
    Signal { signal: AggregateSignal },
    InsufficientData { reason: String },
}

impl FundamentalOutcome {
    pub fn signal(&self) -> Option<&AggregateSignal> {
        match self {
            FundamentalOutcome::Signal { signal } => Some(signal),
            FundamentalOutcome::InsufficientData { .. } => None,
        }
    }
}

/// One news row as presented under the signal header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRow {
    pub label: SentimentLabel,
    pub score: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub outcome: FundamentalOutcome,
    pub reason: String,
    pub news: Vec<NewsRow>,
    pub metrics: serde_json::Value,
}

pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Reduce the news collection to one aggregate label by simple majority.
    ///
    /// Scores are ignored for the vote.
    pub fn aggregate(&self, payload: &NewsPayload) -> FundamentalOutcome {
        match payload {
            NewsPayload::Absent(reason) => FundamentalOutcome::InsufficientData {
                reason: reason.clone(),
            },
            NewsPayload::Present(items) if items.is_empty() => {
                FundamentalOutcome::InsufficientData {
                    reason: "No news available for this issuer".to_string(),
                }
            }
            NewsPayload::Present(items) => {
                let tied = majority_labels(items.iter().map(|item| item.signal.label));
                if tied.is_empty() {
                    return FundamentalOutcome::InsufficientData {
                        reason: "No sentiment labels found".to_string(),
                    };
                }
                FundamentalOutcome::Signal {
                    signal: AggregateSignal(join_labels(&tied, TIE_SEPARATOR)),
                }
            }
        }
    }

    /// Aggregate plus the per-item rows and label counts used for display
    pub fn analyze(&self, payload: &NewsPayload) -> FundamentalReport {
        let outcome = self.aggregate(payload);
        let items = payload.items();

        let (positive, negative, neutral) = count_labels(items);

        let reason = match &outcome {
            FundamentalOutcome::Signal { signal } => format!(
                "{} news sentiment ({} positive, {} negative, {} neutral)",
                signal, positive, negative, neutral
            ),
            FundamentalOutcome::InsufficientData { reason } => {
                format!("Fundamental analysis cannot be done: {}", reason)
            }
        };

        let news = items
            .iter()
            .map(|item| NewsRow {
                label: item.signal.label,
                score: format_score_percent(item.signal.score),
                text: item.text.clone(),
            })
            .collect();

        let metrics = json!({
            "positive_articles": positive,
            "negative_articles": negative,
            "neutral_articles": neutral,
            "total_articles": items.len(),
        });

        FundamentalReport {
            outcome,
            reason,
            news,
            metrics,
        }
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn count_labels(items: &[SentimentItem]) -> (usize, usize, usize) {
    items
        .iter()
        .fold((0, 0, 0), |(p, n, u), item| match item.signal.label {
            SentimentLabel::Positive => (p + 1, n, u),
            SentimentLabel::Negative => (p, n + 1, u),
            SentimentLabel::Neutral => (p, n, u + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::SentimentSignal;

    fn item(label: SentimentLabel, score: f64) -> SentimentItem {
        SentimentItem {
            text: format!("{} headline", label),
            signal: SentimentSignal { label, score },
        }
    }

    #[test]
    fn test_majority_label() {
        let engine = FundamentalAnalysisEngine::new();
        let payload = NewsPayload::Present(vec![
            item(SentimentLabel::Positive, 0.9),
            item(SentimentLabel::Negative, 0.99),
            item(SentimentLabel::Positive, 0.51),
        ]);
        let outcome = engine.aggregate(&payload);
        assert_eq!(outcome.signal().unwrap().as_str(), "positive");
    }

    #[test]
    fn test_tie_is_joined() {
        let engine = FundamentalAnalysisEngine::new();
        let payload = NewsPayload::Present(vec![
            item(SentimentLabel::Positive, 0.7),
            item(SentimentLabel::Neutral, 0.6),
        ]);
        let outcome = engine.aggregate(&payload);
        assert_eq!(outcome.signal().unwrap().as_str(), "positive/neutral");
    }

    #[test]
    fn test_score_does_not_weight_vote() {
        let engine = FundamentalAnalysisEngine::new();
        let payload = NewsPayload::Present(vec![
            item(SentimentLabel::Negative, 1.0),
            item(SentimentLabel::Neutral, 0.01),
            item(SentimentLabel::Neutral, 0.01),
        ]);
        assert_eq!(engine.aggregate(&payload).signal().unwrap().as_str(), "neutral");
    }

    #[test]
    fn test_error_marker_is_insufficient_data() {
        let engine = FundamentalAnalysisEngine::new();
        let payload: NewsPayload =
            serde_json::from_str(r#"{"error": "No news in the past 20 days"}"#).unwrap();
        let outcome = engine.aggregate(&payload);
        assert!(matches!(outcome, FundamentalOutcome::InsufficientData { .. }));
        assert!(outcome.signal().is_none());
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        let engine = FundamentalAnalysisEngine::new();
        let outcome = engine.aggregate(&NewsPayload::Present(vec![]));
        assert!(matches!(outcome, FundamentalOutcome::InsufficientData { .. }));
    }

    #[test]
    fn test_report_rows_and_counts() {
        let engine = FundamentalAnalysisEngine::new();
        let payload = NewsPayload::Present(vec![
            item(SentimentLabel::Positive, 0.8734),
            item(SentimentLabel::Negative, 0.5),
            item(SentimentLabel::Positive, 0.6),
        ]);
        let report = engine.analyze(&payload);
        assert_eq!(report.news.len(), 3);
        assert_eq!(report.news[0].score, "87.3%");
        assert_eq!(report.metrics["positive_articles"], 2);
        assert_eq!(report.metrics["total_articles"], 3);
        assert!(report.reason.starts_with("positive news sentiment"));
    }
}
