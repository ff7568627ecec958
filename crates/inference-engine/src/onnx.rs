//! ONNX Model Backend

use crate::engine::Regressor;
use crate::InferenceError;
use std::path::Path;
use tracing::debug;
use tract_onnx::prelude::*;

/// ONNX regression model run with tract
///
/// The input is pinned to a single `[1, dimension]` f32 row at load time,
/// so a model exported for another width fails to optimize instead of
/// failing on the first request.
pub struct OnnxRegressor {
    plan: TypedRunnableModel<TypedModel>,
    dimension: usize,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX model
    pub fn load(path: &Path, dimension: usize) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, dimension]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        debug!("ONNX model optimized for input [1, {}]", dimension);
        Ok(Self { plan, dimension })
    }
}

impl Regressor for OnnxRegressor {
    fn input_dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.dimension {
            return Err(InferenceError::InvalidInputShape {
                expected: self.dimension,
                actual: features.len(),
            });
        }

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.dimension), row)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no output".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        view.iter()
            .next()
            .map(|&v| v as f64)
            .ok_or_else(|| InferenceError::InferenceFailed("empty model output".to_string()))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use std::path::PathBuf;
    use tract_onnx::pb::{
        tensor_proto::DataType, tensor_shape_proto, type_proto, GraphProto, ModelProto,
        NodeProto, OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
    };

    fn float_value(name: &str, dims: &[i64]) -> ValueInfoProto {
        let dim = dims
            .iter()
            .map(|&d| tensor_shape_proto::Dimension {
                value: Some(tensor_shape_proto::dimension::Value::DimValue(d)),
                ..Default::default()
            })
            .collect();
        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: DataType::Float as i32,
                    shape: Some(TensorShapeProto { dim }),
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// `y = x · w` with `x: [1, 9]` and `w = [1, 2, ..., 9]ᵀ`
    fn write_matmul_model(tag: &str) -> PathBuf {
        let weights = TensorProto {
            name: "w".to_string(),
            dims: vec![9, 1],
            data_type: DataType::Float as i32,
            float_data: (1..=9).map(|v| v as f32).collect(),
            ..Default::default()
        };
        let node = NodeProto {
            name: "mm".to_string(),
            op_type: "MatMul".to_string(),
            input: vec!["x".to_string(), "w".to_string()],
            output: vec!["y".to_string()],
            ..Default::default()
        };
        let model = ModelProto {
            ir_version: 7,
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(GraphProto {
                name: "price".to_string(),
                node: vec![node],
                initializer: vec![weights],
                input: vec![float_value("x", &[1, 9])],
                output: vec![float_value("y", &[1, 1])],
                ..Default::default()
            }),
            ..Default::default()
        };

        let path = std::env::temp_dir().join(format!(
            "immo-model-{}-{}.onnx",
            std::process::id(),
            tag
        ));
        std::fs::write(&path, model.encode_to_vec()).unwrap();
        path
    }

    #[test]
    fn test_matmul_model_prediction() {
        let path = write_matmul_model("predict");
        let model = OnnxRegressor::load(&path, 9);
        std::fs::remove_file(&path).ok();
        let model = model.unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(model.input_dimension(), 9);
        assert_eq!(model.kind(), "onnx");
        assert!((model.predict(&[1.0; 9]).unwrap() - 45.0).abs() < 1e-4);

        let mut row = [0.0; 9];
        row[8] = 2.0;
        assert!((model.predict(&row).unwrap() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_row_width_checked_before_running() {
        let path = write_matmul_model("width");
        let model = OnnxRegressor::load(&path, 9);
        std::fs::remove_file(&path).ok();
        let model = model.unwrap_or_else(|e| panic!("{e}"));

        assert!(matches!(
            model.predict(&[1.0; 7]),
            Err(InferenceError::InvalidInputShape { expected: 9, actual: 7 })
        ));
    }

    #[test]
    fn test_wrong_model_width_fails_at_load() {
        let path = write_matmul_model("narrow");
        let result = OnnxRegressor::load(&path, 7);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let err = OnnxRegressor::load(Path::new("/nonexistent/immo_model.onnx"), 9)
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }
}
