//! Prediction Request Types

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A numeric field as it arrives from the form: either a JSON number or
/// the text typed into an input box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Coerce to a float, parsing text if needed
    pub fn to_f64(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            NumberOrText::Number(n) => Ok(*n),
            NumberOrText::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::MissingField(field));
                }
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(v),
                    _ => Err(ValidationError::NotANumber {
                        field,
                        value: s.clone(),
                    }),
                }
            }
        }
    }
}

impl From<f64> for NumberOrText {
    fn from(value: f64) -> Self {
        NumberOrText::Number(value)
    }
}

impl From<&str> for NumberOrText {
    fn from(value: &str) -> Self {
        NumberOrText::Text(value.to_string())
    }
}

/// Inbound prediction request
///
/// Every field is optional at the wire level so a missing field is
/// reported as [`ValidationError::MissingField`] rather than a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Living area (m²)
    pub surface: Option<NumberOrText>,
    /// Year the house was built
    pub year: Option<NumberOrText>,
    /// City
    pub location: Option<String>,
    /// Garage present ("Oui" / "Non")
    pub garage: Option<String>,
    /// Overall condition
    pub condition: Option<String>,
}

impl PredictRequest {
    /// Parse a request from a raw JSON body
    ///
    /// Only a JSON object is accepted; serde would otherwise also map a
    /// positional array onto the struct fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        let invalid = |e: serde_json::Error| ValidationError::InvalidFormat(e.to_string());
        let value: serde_json::Value = serde_json::from_slice(body).map_err(invalid)?;
        if !value.is_object() {
            return Err(ValidationError::InvalidFormat(
                "request body must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(invalid)
    }
}

/// Validated house attributes, one per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub area: f64,
    pub year_built: i32,
    pub location: String,
    pub garage: String,
    pub condition: String,
}
