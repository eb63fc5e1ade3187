//! On-disk encodings of artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, SentimenError};

/// Encoding of an artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `<name>.json`, via serde_json.
    Json,
    /// `<name>.bin`, via bincode's serde bridge.
    Bincode,
}

impl Encoding {
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Bincode => "bin",
        }
    }

    /// Path of artifact `name` inside `dir` with this encoding.
    pub fn path_in(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.{}", self.extension()))
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            Encoding::Json => Ok(serde_json::from_slice(bytes)?),
            Encoding::Bincode => {
                let (value, consumed): (T, usize) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                        .map_err(|e| SentimenError::serialization(e.to_string()))?;
                if consumed != bytes.len() {
                    return Err(SentimenError::serialization(format!(
                        "{} trailing bytes after artifact",
                        bytes.len() - consumed
                    )));
                }
                Ok(value)
            }
        }
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            Encoding::Json => Ok(serde_json::to_vec_pretty(value)?),
            Encoding::Bincode => bincode::serde::encode_to_vec(value, bincode::config::standard())
                .map_err(|e| SentimenError::serialization(e.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Json => f.write_str("json"),
            Encoding::Bincode => f.write_str("bincode"),
        }
    }
}

/// Which encodings the loader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Try JSON first, then bincode.
    #[default]
    Auto,
    Json,
    Bincode,
}

impl ArtifactFormat {
    /// Encodings to try, in order.
    pub fn candidates(&self) -> &'static [Encoding] {
        match self {
            ArtifactFormat::Auto => &[Encoding::Json, Encoding::Bincode],
            ArtifactFormat::Json => &[Encoding::Json],
            ArtifactFormat::Bincode => &[Encoding::Bincode],
        }
    }
}
