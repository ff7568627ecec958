//! Price Formatting

use serde::{Deserialize, Serialize};

/// Model output ready for the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw predicted price
    pub value: f64,
    /// Display form, e.g. `"1,234,567.89 €"`
    pub formatted: String,
}

impl PredictionResult {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            formatted: format_price(value),
        }
    }
}

/// Render a price with comma thousands separators, two decimals and a
/// euro suffix.
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{fraction} €")
}
