//! One-shot memo of the artifact load result.

use std::sync::{Arc, OnceLock};

use log::debug;

use crate::artifacts::{ArtifactBundle, ArtifactConfig, load_bundle};
use crate::error::LoadError;

/// Shared outcome of loading the artifacts.
pub type LoadResult = std::result::Result<Arc<ArtifactBundle>, LoadError>;

/// Loads the artifact bundle at most once and hands out the same outcome on
/// every later call, failures included. A failed load stays failed until the
/// process restarts.
#[derive(Debug)]
pub struct ArtifactCache {
    config: ArtifactConfig,
    outcome: OnceLock<LoadResult>,
}

impl ArtifactCache {
    pub fn new(config: ArtifactConfig) -> Self {
        ArtifactCache {
            config,
            outcome: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    /// The load outcome, loading on first call.
    pub fn get(&self) -> LoadResult {
        self.outcome
            .get_or_init(|| {
                debug!("First artifact load from {}", self.config.dir.display());
                load_bundle(&self.config).map(Arc::new)
            })
            .clone()
    }

    /// Whether a load has been attempted.
    pub fn is_loaded(&self) -> bool {
        self.outcome.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn test_failure_is_memoized() {
        let dir = TempDir::new().unwrap();
        let cache = ArtifactCache::new(ArtifactConfig::new(dir.path()));
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap_err();
        assert!(cache.is_loaded());

        // Artifacts appearing later do not revive a failed cache.
        fs::write(dir.path().join("model_bernoulli_nb.json"), "{}").unwrap();
        let second = cache.get().unwrap_err();
        assert_eq!(first, second);
    }
}
