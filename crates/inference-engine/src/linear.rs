//! Linear Regression Model

use crate::engine::Regressor;
use crate::InferenceError;
use feature_engine::FEATURE_NAMES;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Linear model exported as JSON
///
/// ```json
/// {"intercept": 215000.0, "coefficients": [...], "feature_names": ["Area", ...]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Training column order, checked against the feature schema on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearRegressor {
    /// Create from fitted parameters
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            feature_names: None,
        }
    }

    /// Load a JSON artifact
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))
    }

    /// Parse and check a JSON artifact
    pub fn from_json(raw: &str) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_str(raw)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;
        model.check()?;
        debug!(
            "Linear model: intercept={}, {} coefficients",
            model.intercept,
            model.coefficients.len()
        );
        Ok(model)
    }

    fn check(&self) -> Result<(), InferenceError> {
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::ModelLoadError(
                "non-finite model parameter".to_string(),
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(InferenceError::ModelLoadError(format!(
                    "model trained on columns {:?}, expected {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn input_dimension(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new(100.0, vec![2.0, -1.0, 0.5]);
        assert_eq!(model.predict(&[1.0, 2.0, 4.0]).unwrap(), 102.0);
    }

    #[test]
    fn test_length_mismatch() {
        let model = LinearRegressor::new(0.0, vec![1.0, 1.0]);
        assert!(matches!(
            model.predict(&[1.0]),
            Err(InferenceError::InvalidInputShape { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_from_json_with_names() {
        let raw = format!(
            r#"{{"intercept": 1.0, "coefficients": [0,0,0,0,0,0,0,0,0], "feature_names": {}}}"#,
            serde_json::to_string(&FEATURE_NAMES).unwrap()
        );
        let model = LinearRegressor::from_json(&raw).unwrap();
        assert_eq!(model.input_dimension(), 9);
    }

    #[test]
    fn test_reordered_names_rejected() {
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.swap(2, 4);
        let raw = format!(
            r#"{{"intercept": 1.0, "coefficients": [0,0,0,0,0,0,0,0,0], "feature_names": {}}}"#,
            serde_json::to_string(&names).unwrap()
        );
        assert!(LinearRegressor::from_json(&raw).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LinearRegressor::from_json("{\"intercept\": 1.0}"),
            Err(InferenceError::ModelLoadError(_))
        ));
    }
}
