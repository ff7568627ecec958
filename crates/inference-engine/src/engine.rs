//! Inference Engine Implementation

use crate::linear::LinearRegressor;
use crate::onnx::OnnxRegressor;
use crate::InferenceError;
use feature_engine::FeatureVector;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A loaded regression model
///
/// Implementations are immutable after loading so one instance can serve
/// any number of concurrent requests.
pub trait Regressor: Send + Sync {
    /// Number of input features the model expects
    fn input_dimension(&self) -> usize;

    /// Predict a single row
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Short model family name for logs and health output
    fn kind(&self) -> &'static str;
}

/// Adapter between encoded features and the trained price model
pub struct PricePredictor {
    regressor: Box<dyn Regressor>,
    model_path: PathBuf,
}

impl std::fmt::Debug for PricePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricePredictor")
            .field("kind", &self.regressor.kind())
            .field("input_dimension", &self.regressor.input_dimension())
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl PricePredictor {
    /// Load a model artifact, picking the backend from the file extension
    ///
    /// `.onnx` files run through tract, `.json` files hold a linear model.
    /// Fails unless the model takes exactly `expected_dimension` inputs.
    pub fn load(path: &Path, expected_dimension: usize) -> Result<Self, InferenceError> {
        info!("Loading price model: {}", path.display());

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let regressor: Box<dyn Regressor> = match extension.as_deref() {
            Some("onnx") => Box::new(OnnxRegressor::load(path, expected_dimension)?),
            Some("json") => Box::new(LinearRegressor::load(path)?),
            _ => {
                return Err(InferenceError::ModelLoadError(format!(
                    "unsupported model format: {}",
                    path.display()
                )))
            }
        };

        let predictor = Self::from_regressor(regressor, path, expected_dimension)?;
        info!(
            "Model loaded successfully: kind={}, inputs={}",
            predictor.kind(),
            predictor.input_dimension()
        );
        Ok(predictor)
    }

    /// Wrap an already loaded regressor
    pub fn from_regressor(
        regressor: Box<dyn Regressor>,
        model_path: impl Into<PathBuf>,
        expected_dimension: usize,
    ) -> Result<Self, InferenceError> {
        let actual = regressor.input_dimension();
        if actual != expected_dimension {
            return Err(InferenceError::InvalidInputShape {
                expected: expected_dimension,
                actual,
            });
        }
        Ok(Self {
            regressor,
            model_path: model_path.into(),
        })
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let start = std::time::Instant::now();

        let value = self.regressor.predict(features.values())?;
        if !value.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "model returned non-finite value {value}"
            )));
        }

        debug!("Inference completed in {:?}: {}", start.elapsed(), value);
        Ok(value)
    }

    /// Model family
    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Inputs the model expects
    pub fn input_dimension(&self) -> usize {
        self.regressor.input_dimension()
    }

    /// Get model path
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FEATURE_DIMENSION;

    struct Constant(f64, usize);

    impl Regressor for Constant {
        fn input_dimension(&self) -> usize {
            self.1
        }

        fn predict(&self, _features: &[f64]) -> Result<f64, InferenceError> {
            Ok(self.0)
        }

        fn kind(&self) -> &'static str {
            "constant"
        }
    }

    #[test]
    fn test_predict_passes_through() {
        let predictor = PricePredictor::from_regressor(
            Box::new(Constant(250_000.0, FEATURE_DIMENSION)),
            "mock",
            FEATURE_DIMENSION,
        )
        .unwrap();
        assert_eq!(predictor.predict(&FeatureVector::default()).unwrap(), 250_000.0);
        assert_eq!(predictor.kind(), "constant");
    }

    struct Sum;

    impl Regressor for Sum {
        fn input_dimension(&self) -> usize {
            FEATURE_DIMENSION
        }

        fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
            Ok(features.iter().sum())
        }

        fn kind(&self) -> &'static str {
            "sum"
        }
    }

    #[test]
    fn test_full_vector_reaches_regressor() {
        let predictor =
            PricePredictor::from_regressor(Box::new(Sum), "sum", FEATURE_DIMENSION).unwrap();
        let features = FeatureVector::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(predictor.predict(&features).unwrap(), 45.0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = PricePredictor::from_regressor(
            Box::new(Constant(1.0, 7)),
            "mock",
            FEATURE_DIMENSION,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidInputShape { expected: 9, actual: 7 }
        ));
    }

    #[test]
    fn test_non_finite_output_is_error() {
        let predictor = PricePredictor::from_regressor(
            Box::new(Constant(f64::NAN, FEATURE_DIMENSION)),
            "mock",
            FEATURE_DIMENSION,
        )
        .unwrap();
        assert!(matches!(
            predictor.predict(&FeatureVector::default()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = PricePredictor::load(Path::new("models/immo_model.joblib"), FEATURE_DIMENSION)
            .unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }
}
