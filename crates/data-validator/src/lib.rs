//! Data Validation
//!
//! Parses the raw prediction request and validates it into a typed
//! [`RawInput`] before any feature encoding happens.

mod error;
mod request;
mod validator;

pub use error::ValidationError;
pub use request::{NumberOrText, PredictRequest, RawInput};
pub use validator::{ValidationConfig, Validator};
