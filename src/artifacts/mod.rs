//! Artifact store: loads the five fitted artifacts once, validates that they
//! agree on one feature space, and hands them out read-only.
//!
//! Loading is all-or-nothing. If any artifact is missing, unreadable,
//! undecodable or inconsistent, [`load_bundle`] returns a single
//! [`LoadError`] and nothing is usable.
//!
//! # Example
//!
//! ```no_run
//! use sentimen::artifacts::{ArtifactConfig, load_bundle};
//!
//! let bundle = load_bundle(&ArtifactConfig::new("models")).unwrap();
//! println!("{} features", bundle.vectorizer().dim());
//! ```

pub mod cache;
pub mod format;
pub mod tools;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::de::DeserializeOwned;

use crate::analysis::tools::PreprocessingTools;
use crate::error::{LoadError, Result, SentimenError};
use crate::ml::{BernoulliNb, Classifier, LinearSvm, TfIdfVectorizer, VotingClassifier};

pub use cache::ArtifactCache;
pub use format::{ArtifactFormat, Encoding};
pub use tools::{StemmerSpec, StopwordSpec, ToolsArtifact};

/// The five artifacts, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    BernoulliNb,
    LinearSvm,
    EnsembleVoting,
    Vectorizer,
    PreprocessingTools,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::BernoulliNb,
        ArtifactKind::LinearSvm,
        ArtifactKind::EnsembleVoting,
        ArtifactKind::Vectorizer,
        ArtifactKind::PreprocessingTools,
    ];

    /// File stem of the artifact.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ArtifactKind::BernoulliNb => "model_bernoulli_nb",
            ArtifactKind::LinearSvm => "model_linear_svm",
            ArtifactKind::EnsembleVoting => "model_ensemble_voting",
            ArtifactKind::Vectorizer => "vectorizer_tfidf",
            ArtifactKind::PreprocessingTools => "preprocessing_tools",
        }
    }
}

/// Where and how to load artifacts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub format: ArtifactFormat,
}

impl ArtifactConfig {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ArtifactConfig {
            dir: dir.into(),
            format: ArtifactFormat::Auto,
        }
    }

    pub fn with_format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig::new(".")
    }
}

/// Every loaded artifact. Immutable once built.
#[derive(Debug)]
pub struct ArtifactBundle {
    bernoulli_nb: BernoulliNb,
    linear_svm: LinearSvm,
    ensemble: VotingClassifier,
    vectorizer: TfIdfVectorizer,
    tools_artifact: ToolsArtifact,
    tools: PreprocessingTools,
}

impl ArtifactBundle {
    /// Assemble a bundle from already decoded artifacts, applying the same
    /// checks as [`load_bundle`].
    pub fn new(
        bernoulli_nb: BernoulliNb,
        linear_svm: LinearSvm,
        ensemble: VotingClassifier,
        vectorizer: TfIdfVectorizer,
        tools_artifact: ToolsArtifact,
    ) -> std::result::Result<Self, LoadError> {
        let invalid = |kind: ArtifactKind| {
            move |e: SentimenError| LoadError::invalid(kind.file_stem(), e.to_string())
        };

        bernoulli_nb
            .validate()
            .map_err(invalid(ArtifactKind::BernoulliNb))?;
        linear_svm
            .validate()
            .map_err(invalid(ArtifactKind::LinearSvm))?;
        ensemble
            .validate()
            .map_err(invalid(ArtifactKind::EnsembleVoting))?;
        vectorizer
            .validate()
            .map_err(invalid(ArtifactKind::Vectorizer))?;
        let tools = tools_artifact
            .build()
            .map_err(invalid(ArtifactKind::PreprocessingTools))?;

        let dim = vectorizer.dim();
        let models: [(ArtifactKind, &dyn Classifier); 3] = [
            (ArtifactKind::BernoulliNb, &bernoulli_nb),
            (ArtifactKind::LinearSvm, &linear_svm),
            (ArtifactKind::EnsembleVoting, &ensemble),
        ];
        for (kind, model) in models {
            if model.n_features() != dim {
                return Err(LoadError::FeatureMismatch {
                    artifact: kind.file_stem().to_string(),
                    expected: model.n_features(),
                    actual: dim,
                });
            }
        }

        Ok(ArtifactBundle {
            bernoulli_nb,
            linear_svm,
            ensemble,
            vectorizer,
            tools_artifact,
            tools,
        })
    }

    pub fn bernoulli_nb(&self) -> &BernoulliNb {
        &self.bernoulli_nb
    }

    pub fn linear_svm(&self) -> &LinearSvm {
        &self.linear_svm
    }

    pub fn ensemble(&self) -> &VotingClassifier {
        &self.ensemble
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn tools(&self) -> &PreprocessingTools {
        &self.tools
    }

    pub fn tools_artifact(&self) -> &ToolsArtifact {
        &self.tools_artifact
    }
}

/// Load and validate all five artifacts.
pub fn load_bundle(config: &ArtifactConfig) -> std::result::Result<ArtifactBundle, LoadError> {
    let result = load_all(config);
    match &result {
        Ok(bundle) => info!(
            "Loaded artifacts from {}: {} features, {:?} voting over {} estimators",
            config.dir.display(),
            bundle.vectorizer.dim(),
            bundle.ensemble.voting(),
            bundle.ensemble.estimators().len()
        ),
        Err(e) => error!("Failed to load artifacts from {}: {e}", config.dir.display()),
    }
    result
}

fn load_all(config: &ArtifactConfig) -> std::result::Result<ArtifactBundle, LoadError> {
    let bernoulli_nb = read_artifact(config, ArtifactKind::BernoulliNb)?;
    let linear_svm = read_artifact(config, ArtifactKind::LinearSvm)?;
    let ensemble = read_artifact(config, ArtifactKind::EnsembleVoting)?;
    let vectorizer = read_artifact(config, ArtifactKind::Vectorizer)?;
    let tools_artifact = read_artifact(config, ArtifactKind::PreprocessingTools)?;

    ArtifactBundle::new(bernoulli_nb, linear_svm, ensemble, vectorizer, tools_artifact)
}

/// Read one artifact, probing the accepted encodings in order.
fn read_artifact<T: DeserializeOwned>(
    config: &ArtifactConfig,
    kind: ArtifactKind,
) -> std::result::Result<T, LoadError> {
    let name = kind.file_stem();
    let mut searched = Vec::new();

    for encoding in config.format.candidates() {
        let path = encoding.path_in(&config.dir, name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                searched.push(path);
                continue;
            }
            Err(e) => {
                return Err(LoadError::Read {
                    artifact: name.to_string(),
                    path,
                    message: e.to_string(),
                });
            }
        };

        debug!("Reading {name} from {} ({} bytes)", path.display(), bytes.len());
        return encoding.decode(&bytes).map_err(|e| LoadError::Decode {
            artifact: name.to_string(),
            path,
            message: e.to_string(),
        });
    }

    Err(LoadError::NotFound {
        artifact: name.to_string(),
        searched,
    })
}

/// Write every artifact of `bundle` into `dir` using `encoding`.
///
/// Returns the written paths in load order.
pub fn export_bundle(
    bundle: &ArtifactBundle,
    dir: &Path,
    encoding: Encoding,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
    for kind in ArtifactKind::ALL {
        let bytes = match kind {
            ArtifactKind::BernoulliNb => encoding.encode(&bundle.bernoulli_nb)?,
            ArtifactKind::LinearSvm => encoding.encode(&bundle.linear_svm)?,
            ArtifactKind::EnsembleVoting => encoding.encode(&bundle.ensemble)?,
            ArtifactKind::Vectorizer => encoding.encode(&bundle.vectorizer)?,
            ArtifactKind::PreprocessingTools => encoding.encode(&bundle.tools_artifact)?,
        };

        let path = encoding.path_in(dir, kind.file_stem());
        fs::write(&path, bytes)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    info!("Exported {} artifacts to {} as {encoding}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{Estimator, NamedEstimator, PlattCalibration, Sentiment, Voting};
    use tempfile::TempDir;

    fn bundle_parts(dim: usize) -> (BernoulliNb, LinearSvm, VotingClassifier, TfIdfVectorizer) {
        let nb = BernoulliNb::new(
            Sentiment::ALL,
            [0.5f64.ln(), 0.5f64.ln()],
            [vec![0.3f64.ln(); dim], vec![0.6f64.ln(); dim]],
        )
        .unwrap();
        let svm = LinearSvm::new(Sentiment::ALL, vec![1.0; dim], -0.1)
            .unwrap()
            .with_calibration(PlattCalibration { a: -2.0, b: 0.0 });
        let ensemble = VotingClassifier::new(
            Sentiment::ALL,
            vec![
                NamedEstimator::new("bnb", Estimator::BernoulliNb(nb.clone())),
                NamedEstimator::new("svm", Estimator::LinearSvm(svm.clone())),
            ],
            Voting::Soft,
            Some(vec![1.0, 1.0]),
        )
        .unwrap();
        let vocabulary = ["film", "bagus", "jelek"]
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        let vectorizer = TfIdfVectorizer::new(vocabulary, vec![1.0, 1.2, 1.4]).unwrap();
        (nb, svm, ensemble, vectorizer)
    }

    fn bundle() -> ArtifactBundle {
        let (nb, svm, ensemble, vectorizer) = bundle_parts(3);
        ArtifactBundle::new(nb, svm, ensemble, vectorizer, ToolsArtifact::default()).unwrap()
    }

    #[test]
    fn test_file_stems() {
        let stems: Vec<_> = ArtifactKind::ALL.iter().map(|k| k.file_stem()).collect();
        assert_eq!(
            stems,
            vec![
                "model_bernoulli_nb",
                "model_linear_svm",
                "model_ensemble_voting",
                "vectorizer_tfidf",
                "preprocessing_tools"
            ]
        );
    }

    #[test]
    fn test_missing_directory() {
        let config = ArtifactConfig::new("/nonexistent/sentimen/artifacts");
        let error = load_bundle(&config).unwrap_err();

        assert_eq!(error.artifact(), "model_bernoulli_nb");
        match error {
            LoadError::NotFound { searched, .. } => assert_eq!(searched.len(), 2),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_export_and_load_both_encodings() {
        let bundle = bundle();

        for encoding in [Encoding::Json, Encoding::Bincode] {
            let dir = TempDir::new().unwrap();
            let written = export_bundle(&bundle, dir.path(), encoding).unwrap();
            assert_eq!(written.len(), 5);

            let loaded = load_bundle(&ArtifactConfig::new(dir.path())).unwrap();
            assert_eq!(loaded.vectorizer().dim(), 3);
            assert_eq!(loaded.ensemble(), bundle.ensemble());
            assert_eq!(loaded.bernoulli_nb(), bundle.bernoulli_nb());
            assert_eq!(loaded.linear_svm(), bundle.linear_svm());
            assert_eq!(loaded.tools_artifact(), bundle.tools_artifact());

            let features = bundle.vectorizer().transform("film bagus").unwrap();
            assert_eq!(loaded.vectorizer().transform("film bagus").unwrap(), features);
        }
    }

    #[test]
    fn test_format_restricts_probing() {
        let dir = TempDir::new().unwrap();
        export_bundle(&bundle(), dir.path(), Encoding::Bincode).unwrap();

        let json_only = ArtifactConfig::new(dir.path()).with_format(ArtifactFormat::Json);
        assert!(matches!(
            load_bundle(&json_only),
            Err(LoadError::NotFound { .. })
        ));

        let bincode_only = ArtifactConfig::new(dir.path()).with_format(ArtifactFormat::Bincode);
        assert!(load_bundle(&bincode_only).is_ok());
    }

    #[test]
    fn test_one_missing_artifact_fails_everything() {
        let dir = TempDir::new().unwrap();
        export_bundle(&bundle(), dir.path(), Encoding::Json).unwrap();
        fs::remove_file(dir.path().join("preprocessing_tools.json")).unwrap();

        let error = load_bundle(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert_eq!(error.artifact(), "preprocessing_tools");
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        export_bundle(&bundle(), dir.path(), Encoding::Json).unwrap();
        fs::write(dir.path().join("vectorizer_tfidf.json"), "{ not json").unwrap();

        let error = load_bundle(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(matches!(error, LoadError::Decode { .. }));
        assert_eq!(error.artifact(), "vectorizer_tfidf");
    }

    #[test]
    fn test_unknown_class_fails_to_decode() {
        let dir = TempDir::new().unwrap();
        export_bundle(&bundle(), dir.path(), Encoding::Json).unwrap();
        let path = dir.path().join("model_linear_svm.json");
        let json = fs::read_to_string(&path).unwrap().replace("\"negative\"", "\"neutral\"");
        fs::write(&path, json).unwrap();

        let error = load_bundle(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(matches!(error, LoadError::Decode { .. }));
        assert_eq!(error.artifact(), "model_linear_svm");
    }

    #[test]
    fn test_feature_space_mismatch() {
        let (nb, svm, ensemble, _) = bundle_parts(4);
        let (_, _, _, vectorizer) = bundle_parts(3);

        let error =
            ArtifactBundle::new(nb, svm, ensemble, vectorizer, ToolsArtifact::default()).unwrap_err();
        assert_eq!(
            error,
            LoadError::FeatureMismatch {
                artifact: "model_bernoulli_nb".to_string(),
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_invalid_content() {
        let dir = TempDir::new().unwrap();
        export_bundle(&bundle(), dir.path(), Encoding::Json).unwrap();
        fs::write(
            dir.path().join("vectorizer_tfidf.json"),
            r#"{"vocabulary": {"film": 0, "bagus": 0, "jelek": 2}, "idf": [1.0, 1.0, 1.0]}"#,
        )
        .unwrap();

        let error = load_bundle(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(matches!(error, LoadError::Invalid { .. }));
        assert_eq!(error.artifact(), "vectorizer_tfidf");
    }
}
