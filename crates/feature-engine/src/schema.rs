//! Feature Schema
//!
//! The column layout the price model was trained on. Encoding walks this
//! table slot by slot, so the table order is the output order.

use serde::{Deserialize, Serialize};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 9;

/// Numeric input fields, scaled with training mean/std
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    Area,
    YearBuilt,
}

impl NumericField {
    /// All numeric fields in schema order
    pub const ALL: [NumericField; 2] = [NumericField::Area, NumericField::YearBuilt];

    /// Dataset column name
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Area => "Area",
            NumericField::YearBuilt => "YearBuilt",
        }
    }
}

/// Categorical input fields, one-hot encoded with the first label dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    Location,
    Garage,
    Condition,
}

impl CategoricalField {
    /// All categorical fields in schema order
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Location,
        CategoricalField::Garage,
        CategoricalField::Condition,
    ];

    /// Dataset column name
    pub fn column(&self) -> &'static str {
        match self {
            CategoricalField::Location => "Location",
            CategoricalField::Garage => "Garage",
            CategoricalField::Condition => "Condition",
        }
    }

    /// Indicator labels declared for this field, in schema order
    pub fn indicator_labels(&self) -> Vec<&'static str> {
        FEATURE_SCHEMA
            .iter()
            .filter_map(|slot| match slot {
                FeatureSlot::Indicator(field, label) if field == self => Some(*label),
                _ => None,
            })
            .collect()
    }
}

/// One column of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSlot {
    /// `(value - mean) / std` of a numeric field
    Scaled(NumericField),
    /// 1.0 when the field equals the label, else 0.0
    Indicator(CategoricalField, &'static str),
}

impl FeatureSlot {
    /// Column name as seen by the model
    pub fn name(&self) -> String {
        match self {
            FeatureSlot::Scaled(field) => field.column().to_string(),
            FeatureSlot::Indicator(field, label) => format!("{}_{}", field.column(), label),
        }
    }
}

/// Trained column order
pub const FEATURE_SCHEMA: [FeatureSlot; FEATURE_DIMENSION] = [
    FeatureSlot::Scaled(NumericField::Area),
    FeatureSlot::Scaled(NumericField::YearBuilt),
    FeatureSlot::Indicator(CategoricalField::Location, "Lyon"),
    FeatureSlot::Indicator(CategoricalField::Location, "Marseille"),
    FeatureSlot::Indicator(CategoricalField::Location, "Paris"),
    FeatureSlot::Indicator(CategoricalField::Garage, "Oui"),
    FeatureSlot::Indicator(CategoricalField::Condition, "Fair"),
    FeatureSlot::Indicator(CategoricalField::Condition, "Good"),
    FeatureSlot::Indicator(CategoricalField::Condition, "Poor"),
];

/// Trained column names
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "Area",
    "YearBuilt",
    "Location_Lyon",
    "Location_Marseille",
    "Location_Paris",
    "Garage_Oui",
    "Condition_Fair",
    "Condition_Good",
    "Condition_Poor",
];

/// Position of a named column in the schema
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}
