//! Feature Engineering Engine
//!
//! Fits reference statistics from the historical house dataset and encodes
//! validated requests into the exact feature layout the price model expects.

mod encoder;
mod error;
mod schema;
mod statistics;

pub use encoder::{FeatureEncoder, FeatureVector};
pub use error::FeatureError;
pub use schema::{
    feature_index, CategoricalField, FeatureSlot, NumericField, FEATURE_DIMENSION, FEATURE_NAMES,
    FEATURE_SCHEMA,
};
pub use statistics::{ReferenceStatistics, ScalingParams, Vocabulary};
