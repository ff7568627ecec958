//! Request Validator for Range Checking

use crate::error::ValidationError;
use crate::request::{NumberOrText, PredictRequest, RawInput};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted living area (m²); the lower bound is exclusive zero
    pub max_area: f64,
    /// Oldest accepted construction year
    pub min_year: i32,
    /// How many years past the current one are still accepted
    pub future_years: i32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_area: 100_000.0,
            min_year: 1800,
            future_years: 1,
        }
    }
}

/// Validator turning a [`PredictRequest`] into a [`RawInput`]
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Access the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate the living area
    pub fn validate_area(&self, area: f64) -> Result<f64, ValidationError> {
        if !area.is_finite() {
            return Err(ValidationError::NotANumber {
                field: "surface",
                value: area.to_string(),
            });
        }
        if area <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "surface",
                value: area,
                min: 0.0,
                max: self.config.max_area,
            });
        }
        self.validate_range("surface", area, (0.0, self.config.max_area))?;
        Ok(area)
    }

    /// Validate the construction year against `current_year`
    pub fn validate_year(&self, year: f64, current_year: i32) -> Result<i32, ValidationError> {
        if !year.is_finite() {
            return Err(ValidationError::NotANumber {
                field: "year",
                value: year.to_string(),
            });
        }
        if year.fract() != 0.0 {
            return Err(ValidationError::NotAnInteger { field: "year", value: year });
        }
        let max_year = current_year.saturating_add(self.config.future_years);
        self.validate_range("year", year, (self.config.min_year as f64, max_year as f64))?;
        Ok(year as i32)
    }

    /// Validate a request using the current UTC year
    pub fn validate(&self, request: &PredictRequest) -> Result<RawInput, ValidationError> {
        self.validate_at(request, chrono::Utc::now().year())
    }

    /// Validate a request as if it were `current_year`
    pub fn validate_at(
        &self,
        request: &PredictRequest,
        current_year: i32,
    ) -> Result<RawInput, ValidationError> {
        let area = required_number(&request.surface, "surface")?;
        let area = self.validate_area(area)?;

        let year = required_number(&request.year, "year")?;
        let year_built = self.validate_year(year, current_year)?;

        let input = RawInput {
            area,
            year_built,
            location: required_text(&request.location, "location")?,
            garage: required_text(&request.garage, "garage")?,
            condition: required_text(&request.condition, "condition")?,
        };
        debug!("Validated input: {:?}", input);
        Ok(input)
    }
}

fn required_number(
    value: &Option<NumberOrText>,
    field: &'static str,
) -> Result<f64, ValidationError> {
    value
        .as_ref()
        .ok_or(ValidationError::MissingField(field))?
        .to_f64(field)
}

fn required_text(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}
