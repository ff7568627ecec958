//! Prediction context built once at startup

use crate::settings::Settings;
use crate::error::{ApiError, StartupError};
use data_validator::{PredictRequest, Validator};
use feature_engine::{FeatureEncoder, ReferenceStatistics, FEATURE_DIMENSION};
use inference_engine::{InferenceError, PredictionResult, PricePredictor};
use tracing::info;

/// Everything a request needs, immutable after construction
#[derive(Debug)]
pub struct PredictionContext {
    validator: Validator,
    encoder: FeatureEncoder,
    predictor: PricePredictor,
}

impl PredictionContext {
    /// Assemble from loaded parts, asserting the model takes the schema width
    pub fn new(
        validator: Validator,
        encoder: FeatureEncoder,
        predictor: PricePredictor,
    ) -> Result<Self, StartupError> {
        if predictor.input_dimension() != FEATURE_DIMENSION {
            return Err(StartupError::Model(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: predictor.input_dimension(),
            }));
        }
        Ok(Self {
            validator,
            encoder,
            predictor,
        })
    }

    /// Fit statistics and load the model named in `settings`
    pub fn load(settings: &Settings) -> Result<Self, StartupError> {
        let stats =
            ReferenceStatistics::load(&settings.data.scaling_path, &settings.data.vocabulary_path)?;
        let encoder = FeatureEncoder::new(stats)?;
        let predictor = PricePredictor::load(&settings.model.path, FEATURE_DIMENSION)?;
        let context = Self::new(
            Validator::new(settings.validation.clone()),
            encoder,
            predictor,
        )?;
        info!("Prediction context ready");
        Ok(context)
    }

    /// Validate, encode and predict one request
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, ApiError> {
        let raw = self.validator.validate(request)?;
        let features = self.encoder.encode(&raw)?;
        let value = self.predictor.predict(&features)?;
        Ok(PredictionResult::new(value))
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn predictor(&self) -> &PricePredictor {
        &self.predictor
    }
}
