//! Presentation layer: the single review page, its example selector, the
//! form handler and the rendered result.
//!
//! The page has two states. With every artifact loaded it shows the form;
//! otherwise it shows only the load failure notice and accepts no input.

use serde::Serialize;

use crate::artifacts::ArtifactCache;
use crate::artifacts::cache::LoadResult;
use crate::error::{LoadError, SentimenError};
use crate::ml::Sentiment;
use crate::pipeline::{Analysis, AnalyzeOptions, Predictor};

pub const PAGE_TITLE: &str = "Analisis Sentimen Film";
pub const PAGE_SUBTITLE: &str = "Model Ensemble (BernoulliNB + SVM)";
pub const FORM_HEADING: &str = "Masukkan Ulasan Film";
pub const SELECTOR_LABEL: &str = "Pilih contoh ulasan:";
pub const INPUT_LABEL: &str = "Masukkan ulasan film:";
pub const ANALYZE_BUTTON: &str = "Analisis";
pub const COMPARE_TOGGLE: &str = "Bandingkan model";
pub const DETAILS_TOGGLE: &str = "Detail preprocessing";
pub const RESULT_HEADING: &str = "Hasil Analisis (Ensemble)";

/// First selector entry; choosing it leaves the input empty.
pub const MANUAL_ENTRY: &str = "-- Ketik manual --";

pub const EXAMPLE_REVIEWS: [&str; 6] = [
    "Filmnya bagus banget, alurnya tidak ketebak!",
    "Film jelek, buang waktu saja",
    "Keren, aktingnya mantap sekali",
    "Goblok banget filmnya tidak bermutu",
    "Biasa aja sih, tidak terlalu bagus",
    "Luar biasa, sangat recommended!",
];

pub const MISSING_ARTIFACTS_MESSAGE: &str = "File model atau vectorizer tidak ditemukan.";
pub const EMPTY_INPUT_WARNING: &str = "Masukkan teks terlebih dahulu.";

/// Selector entries: the manual-entry sentinel, then the examples.
pub fn selector_options() -> Vec<&'static str> {
    std::iter::once(MANUAL_ENTRY)
        .chain(EXAMPLE_REVIEWS)
        .collect()
}

/// Text placed in the input box for selector entry `index`.
///
/// Index 0 is the sentinel and yields an empty box; `None` means the index
/// is out of range.
pub fn select_example(index: usize) -> Option<&'static str> {
    match index {
        0 => Some(""),
        n => EXAMPLE_REVIEWS.get(n - 1).copied(),
    }
}

/// Display name of a label.
pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "POSITIF",
        Sentiment::Negative => "NEGATIF",
    }
}

/// What the user submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub text: String,
    pub options: AnalyzeOptions,
}

impl FormInput {
    pub fn new<S: Into<String>>(text: S) -> Self {
        FormInput {
            text: text.into(),
            options: AnalyzeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalyzeOptions) -> Self {
        self.options = options;
        self
    }
}

/// What the page shows after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// The input was blank; nothing was analyzed.
    Warning(String),
    /// A completed analysis.
    Result(Box<Analysis>),
    /// The pipeline failed; the message carries the cause.
    Failure(String),
    /// Artifacts never loaded, so the form is not offered.
    Unavailable(String),
}

/// Application state decided once, at startup.
#[derive(Debug, Clone)]
pub enum AppState {
    Ready(Predictor),
    Degraded(LoadError),
}

impl AppState {
    /// Build from the (memoized) artifact load.
    pub fn load(cache: &ArtifactCache) -> Self {
        Self::from_load_result(cache.get())
    }

    pub fn from_load_result(result: LoadResult) -> Self {
        match result.map_err(SentimenError::from).and_then(Predictor::new) {
            Ok(predictor) => AppState::Ready(predictor),
            Err(SentimenError::Load(error)) => AppState::Degraded(error),
            // The normalizer's built-in pattern failing to compile is not an
            // artifact problem, but it leaves the page just as unusable.
            Err(other) => AppState::Degraded(LoadError::invalid("normalizer", other.to_string())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AppState::Ready(_))
    }

    pub fn predictor(&self) -> Option<&Predictor> {
        match self {
            AppState::Ready(predictor) => Some(predictor),
            AppState::Degraded(_) => None,
        }
    }

    /// Notice shown instead of the form in degraded mode.
    pub fn degraded_notice(&self) -> Option<String> {
        match self {
            AppState::Ready(_) => None,
            AppState::Degraded(error) => Some(format!("{MISSING_ARTIFACTS_MESSAGE} ({error})")),
        }
    }

    /// Handle one press of the analyze button.
    pub fn submit(&self, input: &FormInput) -> FormOutcome {
        let predictor = match self {
            AppState::Ready(predictor) => predictor,
            AppState::Degraded(_) => {
                return FormOutcome::Unavailable(self.degraded_notice().unwrap_or_default());
            }
        };

        match predictor.analyze(&input.text, &input.options) {
            Ok(analysis) => FormOutcome::Result(Box::new(analysis)),
            Err(SentimenError::EmptyInput) => FormOutcome::Warning(EMPTY_INPUT_WARNING.to_string()),
            Err(e) => {
                log::warn!("analysis failed: {e}");
                FormOutcome::Failure(format!("Gagal menganalisis: {e}"))
            }
        }
    }
}

/// Display strings of one analysis, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub heading: String,
    pub headline: String,
    pub confidence: String,
    pub probabilities: Vec<(String, String)>,
    pub comparison: Option<Vec<(String, String)>>,
    pub details: Option<Vec<(String, String)>>,
}

impl ResultView {
    pub fn new(analysis: &Analysis) -> Self {
        let comparison = analysis.comparison.map(|comparison| {
            vec![
                (
                    "BernoulliNB".to_string(),
                    sentiment_label(comparison.bernoulli_nb).to_string(),
                ),
                (
                    "SVM".to_string(),
                    sentiment_label(comparison.linear_svm).to_string(),
                ),
                (
                    "Ensemble".to_string(),
                    sentiment_label(analysis.label).to_string(),
                ),
            ]
        });

        let details = analysis.details.as_ref().map(|trace| {
            vec![
                ("Teks asli".to_string(), trace.original.clone()),
                ("Setelah dibersihkan".to_string(), trace.cleaned.clone()),
                ("Tanpa stopword".to_string(), trace.without_stopwords.clone()),
                ("Setelah stemming".to_string(), trace.stemmed.clone()),
            ]
        });

        ResultView {
            heading: RESULT_HEADING.to_string(),
            headline: format!("Sentimen: {}", sentiment_label(analysis.label)),
            confidence: format!(
                "Tingkat Keyakinan: {} ({})",
                analysis.confidence.band.label(),
                percent(analysis.confidence.percent)
            ),
            probabilities: vec![
                (
                    "Negatif".to_string(),
                    percent(analysis.probabilities.negative * 100.0),
                ),
                (
                    "Positif".to_string(),
                    percent(analysis.probabilities.positive * 100.0),
                ),
            ],
            comparison,
            details,
        }
    }
}

/// Percentage with one decimal.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::pipeline::{Confidence, ConfidenceBand, ModelComparison};
    use crate::ml::Probabilities;

    fn analysis() -> Analysis {
        let probabilities = Probabilities {
            negative: 0.0667,
            positive: 0.9333,
        };
        Analysis {
            review: "Keren".to_string(),
            label: Sentiment::Positive,
            confidence: Confidence::from_probabilities(&probabilities),
            probabilities,
            comparison: Some(ModelComparison {
                bernoulli_nb: Sentiment::Positive,
                linear_svm: Sentiment::Negative,
            }),
            details: None,
        }
    }

    fn degraded() -> AppState {
        AppState::from_load_result(Err(LoadError::NotFound {
            artifact: "model_bernoulli_nb".to_string(),
            searched: vec![PathBuf::from("model_bernoulli_nb.json")],
        }))
    }

    #[test]
    fn test_selector() {
        let options = selector_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0], MANUAL_ENTRY);
        assert_eq!(options[1], "Filmnya bagus banget, alurnya tidak ketebak!");

        assert_eq!(select_example(0), Some(""));
        assert_eq!(select_example(2), Some("Film jelek, buang waktu saja"));
        assert_eq!(select_example(6), Some("Luar biasa, sangat recommended!"));
        assert_eq!(select_example(7), None);
    }

    #[test]
    fn test_result_view() {
        let view = ResultView::new(&analysis());

        assert_eq!(view.headline, "Sentimen: POSITIF");
        assert_eq!(view.confidence, "Tingkat Keyakinan: Tinggi (93.3%)");
        assert_eq!(
            view.probabilities,
            vec![
                ("Negatif".to_string(), "6.7%".to_string()),
                ("Positif".to_string(), "93.3%".to_string()),
            ]
        );

        let comparison = view.comparison.unwrap();
        assert_eq!(comparison[0], ("BernoulliNB".to_string(), "POSITIF".to_string()));
        assert_eq!(comparison[1], ("SVM".to_string(), "NEGATIF".to_string()));
        assert!(view.details.is_none());
    }

    #[test]
    fn test_degraded_gating() {
        let state = degraded();
        assert!(!state.is_ready());
        assert!(state.predictor().is_none());

        let notice = state.degraded_notice().unwrap();
        assert!(notice.starts_with(MISSING_ARTIFACTS_MESSAGE));
        assert!(notice.contains("model_bernoulli_nb"));

        match state.submit(&FormInput::new("Film bagus")) {
            FormOutcome::Unavailable(message) => assert_eq!(message, notice),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_band_in_view() {
        let mut low = analysis();
        low.probabilities = Probabilities {
            negative: 0.45,
            positive: 0.55,
        };
        low.confidence = Confidence::from_probabilities(&low.probabilities);
        assert_eq!(low.confidence.band, ConfidenceBand::Low);
        assert_eq!(
            ResultView::new(&low).confidence,
            "Tingkat Keyakinan: Rendah (55.0%)"
        );
    }
}
