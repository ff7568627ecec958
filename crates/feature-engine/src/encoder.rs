//! Feature Vector Assembly

use crate::error::FeatureError;
use crate::schema::{
    feature_index, CategoricalField, FeatureSlot, NumericField, FEATURE_DIMENSION, FEATURE_NAMES,
    FEATURE_SCHEMA,
};
use crate::statistics::ReferenceStatistics;
use data_validator::RawInput;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Encoded model input, in [`FEATURE_SCHEMA`] order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Wrap already encoded values
    pub fn from_values(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Raw feature values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|idx| self.values[idx])
    }

    /// `(column, value)` pairs in schema order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

/// Encoder that turns validated input into the trained feature layout
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    stats: ReferenceStatistics,
}

impl FeatureEncoder {
    /// Create an encoder, rejecting statistics that disagree with the schema
    pub fn new(stats: ReferenceStatistics) -> Result<Self, FeatureError> {
        stats.check_schema()?;
        Ok(Self { stats })
    }

    /// Fitted statistics in use
    pub fn statistics(&self) -> &ReferenceStatistics {
        &self.stats
    }

    /// Encode one input record
    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector, FeatureError> {
        for field in CategoricalField::ALL {
            let label = categorical_value(raw, field);
            let vocabulary = self.stats.vocabulary(field);
            if !vocabulary.contains(label) {
                return Err(FeatureError::UnknownCategory {
                    field: field.column(),
                    value: label.to_string(),
                    allowed: vocabulary.labels().to_vec(),
                });
            }
        }

        let mut values = [0.0; FEATURE_DIMENSION];
        for (value, slot) in values.iter_mut().zip(FEATURE_SCHEMA.iter()) {
            *value = match *slot {
                FeatureSlot::Scaled(field) => {
                    self.stats.scaling(field).scale(numeric_value(raw, field))
                }
                FeatureSlot::Indicator(field, label) => {
                    if categorical_value(raw, field) == label {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
        }

        let features = FeatureVector { values };
        debug!(
            "Encoded features: {:?}",
            features.named().collect::<Vec<_>>()
        );
        Ok(features)
    }
}

fn numeric_value(raw: &RawInput, field: NumericField) -> f64 {
    match field {
        NumericField::Area => raw.area,
        NumericField::YearBuilt => raw.year_built as f64,
    }
}

fn categorical_value(raw: &RawInput, field: CategoricalField) -> &str {
    match field {
        CategoricalField::Location => &raw.location,
        CategoricalField::Garage => &raw.garage,
        CategoricalField::Condition => &raw.condition,
    }
}
