//! Application configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, a JSON
//! config file, environment variables, and command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactConfig, ArtifactFormat};
use crate::error::{Result, SentimenError};
use crate::pipeline::AnalyzeOptions;

/// Configuration for the sentiment application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the five artifacts.
    pub artifact_dir: PathBuf,
    /// Accepted artifact encodings.
    pub artifact_format: ArtifactFormat,
    /// Default state of the "compare models" toggle.
    pub compare_models: bool,
    /// Default state of the "preprocessing details" toggle.
    pub show_details: bool,
    /// Worker threads for batch analysis; `None` lets rayon decide.
    pub batch_threads: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            artifact_dir: PathBuf::from("."),
            artifact_format: ArtifactFormat::Auto,
            compare_models: true,
            show_details: false,
            batch_threads: None,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SentimenError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            SentimenError::config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_threads == Some(0) {
            return Err(SentimenError::config("batch_threads must be at least 1"));
        }
        Ok(())
    }

    pub fn artifact_config(&self) -> ArtifactConfig {
        ArtifactConfig::new(&self.artifact_dir).with_format(self.artifact_format)
    }

    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            compare_models: self.compare_models,
            show_details: self.show_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.artifact_dir, PathBuf::from("."));
        assert_eq!(config.artifact_format, ArtifactFormat::Auto);
        assert_eq!(config.analyze_options(), AnalyzeOptions::default());
        assert_eq!(config.artifact_config(), ArtifactConfig::default());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentimen.json");
        fs::write(
            &path,
            r#"{"artifact_dir": "models", "artifact_format": "bincode", "show_details": true}"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("models"));
        assert_eq!(config.artifact_format, ArtifactFormat::Bincode);
        assert!(config.compare_models);
        assert!(config.show_details);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::from_file(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"batch_threads": 0}"#).unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(SentimenError::Config(_))
        ));
    }
}
