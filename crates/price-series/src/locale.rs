/// Parse an exchange-formatted number (`1.234,56`) into an `f64`.
///
/// Periods are thousands separators and are dropped; the comma is the
/// decimal separator. Returns `None` for anything that still fails to parse.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let normalized = normalize_locale_number(raw);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rewrite a locale numeral into the `1234.56` form
pub fn normalize_locale_number(raw: &str) -> String {
    raw.trim().replace('.', "").replacen(',', ".", 1)
}
