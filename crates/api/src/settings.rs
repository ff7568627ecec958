//! Service configuration
//!
//! Defaults, overlaid by an optional TOML file, overlaid by `IMMO__*`
//! environment variables (`IMMO__SERVER__ADDR=0.0.0.0:8080`).

use config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file used when `IMMO_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/immo-predict.toml";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub data: DataSettings,
    pub validation: ValidationConfig,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub addr: String,
    /// Allow any origin (for a form served from elsewhere)
    pub cors_permissive: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:5001".to_string(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model artifact, `.onnx` or `.json`
    pub path: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/immo_model.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Dataset the numeric scaling is fitted on (unscaled values)
    pub scaling_path: PathBuf,
    /// Dataset the categorical vocabularies are fitted on
    pub vocabulary_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            scaling_path: PathBuf::from("data/house_pred.csv"),
            vocabulary_path: PathBuf::from("data/house_pred.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load from `IMMO_CONFIG` (or the default path) plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("IMMO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file; a missing file means defaults
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("IMMO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from("/nonexistent/immo-predict").unwrap();
        assert_eq!(settings.server.addr, "0.0.0.0:5001");
        assert_eq!(settings.model.path, PathBuf::from("models/immo_model.json"));
        assert_eq!(settings.validation, ValidationConfig::default());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("immo-predict-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\naddr = \"127.0.0.1:9000\"\n\n[validation]\nmin_year = 1900\n\n[logging]\njson = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.addr, "127.0.0.1:9000");
        assert_eq!(settings.validation.min_year, 1900);
        assert_eq!(settings.validation.future_years, 1);
        assert!(settings.logging.json);
        assert_eq!(settings.data, DataSettings::default());
    }
}
