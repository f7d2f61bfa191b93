use analysis_core::PricePoint;
use serde::{Deserialize, Serialize};

/// Date format of the history table (`31.12.2024`)
pub const TABLE_DATE_FORMAT: &str = "%d.%m.%Y";

/// History table row, columns passed through as published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: String,
    pub last_trade_price: String,
    pub max_price: String,
    pub min_price: String,
    pub avg_price: String,
    pub percent_change: String,
    pub volume: String,
    pub turnover_best: String,
    pub total_turnover: String,
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Rows for the history table, newest first
pub fn price_table(points: &[PricePoint]) -> Vec<PriceRow> {
    let mut ordered: Vec<&PricePoint> = points.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered
        .into_iter()
        .map(|p| PriceRow {
            date: p.date.format(TABLE_DATE_FORMAT).to_string(),
            last_trade_price: p.last_trade_price.clone(),
            max_price: cell(&p.max_price),
            min_price: cell(&p.min_price),
            avg_price: cell(&p.avg_price),
            percent_change: cell(&p.percent_change),
            volume: cell(&p.volume),
            turnover_best: cell(&p.turnover_best),
            total_turnover: cell(&p.total_turnover),
        })
        .collect()
}
