//! End-to-end analysis over the demo artifacts shipped in `models/`.

use std::path::PathBuf;
use std::sync::Arc;

use sentimen::app::{self, AppState, FormInput, FormOutcome, ResultView};
use sentimen::artifacts::{ArtifactCache, ArtifactConfig, ArtifactFormat, load_bundle};
use sentimen::error::{Result, SentimenError};
use sentimen::ml::{Classifier, Sentiment};
use sentimen::pipeline::{AnalyzeOptions, ConfidenceBand, Predictor};

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models")
}

fn predictor() -> Result<Predictor> {
    let bundle = load_bundle(&ArtifactConfig::new(models_dir()))?;
    Predictor::new(Arc::new(bundle))
}

#[test]
fn test_demo_bundle_loads() -> Result<()> {
    let bundle = load_bundle(&ArtifactConfig::new(models_dir()).with_format(ArtifactFormat::Json))?;

    let dim = bundle.vectorizer().dim();
    assert!(dim > 0);
    assert_eq!(bundle.bernoulli_nb().n_features(), dim);
    assert_eq!(bundle.linear_svm().n_features(), dim);
    assert_eq!(bundle.ensemble().n_features(), dim);
    assert!(bundle.ensemble().supports_proba());
    assert!(
        bundle
            .tools()
            .description()
            .starts_with("default indonesian stop words + indonesian stemmer")
    );

    Ok(())
}

#[test]
fn test_example_reviews_normalize() -> Result<()> {
    let predictor = predictor()?;

    let expected = [
        "film bagus banget alur tebak",
        "film jelek buang waktu",
        "keren akting mantap sekali",
        "goblok banget film mutu",
        "biasa aja sih lalu bagus",
        "luar biasa sangat recommended",
    ];
    for (review, normalized) in app::EXAMPLE_REVIEWS.iter().zip(expected) {
        assert_eq!(predictor.normalize(review)?.normalized(), normalized);
    }

    Ok(())
}

#[test]
fn test_example_reviews_labels() -> Result<()> {
    let predictor = predictor()?;
    let options = AnalyzeOptions::default();

    let expected = [
        (Sentiment::Positive, ConfidenceBand::High),
        (Sentiment::Negative, ConfidenceBand::High),
        (Sentiment::Positive, ConfidenceBand::High),
        (Sentiment::Negative, ConfidenceBand::High),
        (Sentiment::Negative, ConfidenceBand::Medium),
        (Sentiment::Positive, ConfidenceBand::High),
    ];
    for (review, (label, band)) in app::EXAMPLE_REVIEWS.iter().zip(expected) {
        let analysis = predictor.analyze(review, &options)?;
        assert_eq!(analysis.label, label, "label of {review:?}");
        assert_eq!(analysis.confidence.band, band, "band of {review:?}");

        let comparison = analysis.comparison.expect("comparison requested");
        assert_eq!(comparison.bernoulli_nb, label);
        assert_eq!(comparison.linear_svm, label);
    }

    Ok(())
}

#[test]
fn test_probability_invariants() -> Result<()> {
    let predictor = predictor()?;
    let reviews = [
        "Filmnya bagus banget!",
        "Ceritanya membosankan dan aktingnya kaku",
        "zzz qqq",
        "123 !!!",
        "Film",
    ];

    for review in reviews {
        let analysis = predictor.analyze(review, &AnalyzeOptions::default())?;
        let p = analysis.probabilities;
        assert!((0.0..=1.0).contains(&p.negative));
        assert!((0.0..=1.0).contains(&p.positive));
        assert!((p.negative + p.positive - 1.0).abs() < 1e-9);
        assert!((analysis.confidence.percent - p.max() * 100.0).abs() < 1e-9);
        assert!(analysis.confidence.percent >= 50.0);
        assert_eq!(analysis.label, p.argmax(&Sentiment::ALL));
    }

    Ok(())
}

#[test]
fn test_unknown_words_still_classify() -> Result<()> {
    let predictor = predictor()?;

    // Nothing survives cleaning, so the feature vector is all zeros.
    let analysis = predictor.analyze("123 !!!", &AnalyzeOptions::default())?;
    assert!(predictor.encode(predictor.normalize("123 !!!")?.normalized())?.is_zero());
    assert_eq!(analysis.label, Sentiment::Negative);
    assert_eq!(analysis.confidence.band, ConfidenceBand::Medium);

    Ok(())
}

#[test]
fn test_repeat_analysis_is_identical() -> Result<()> {
    let predictor = predictor()?;
    let options = AnalyzeOptions {
        compare_models: true,
        show_details: true,
    };

    let first = predictor.analyze(app::EXAMPLE_REVIEWS[0], &options)?;
    for _ in 0..5 {
        assert_eq!(predictor.analyze(app::EXAMPLE_REVIEWS[0], &options)?, first);
    }

    Ok(())
}

#[test]
fn test_blank_review_is_rejected() -> Result<()> {
    let predictor = predictor()?;
    assert!(matches!(
        predictor.analyze("   \n", &AnalyzeOptions::default()),
        Err(SentimenError::EmptyInput)
    ));
    Ok(())
}

#[test]
fn test_batch_over_examples() -> Result<()> {
    let predictor = predictor()?;
    let results = predictor.analyze_batch(&app::EXAMPLE_REVIEWS, &AnalyzeOptions::default());

    let labels: Vec<Sentiment> = results
        .into_iter()
        .map(|result| result.map(|analysis| analysis.label))
        .collect::<Result<_>>()?;
    assert_eq!(
        labels,
        vec![
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Negative,
            Sentiment::Positive,
        ]
    );

    Ok(())
}

#[test]
fn test_form_flow() {
    let cache = ArtifactCache::new(ArtifactConfig::new(models_dir()));
    let state = AppState::load(&cache);
    assert!(state.is_ready());
    assert!(state.degraded_notice().is_none());

    let input = FormInput::new(app::select_example(3).unwrap_or_default()).with_options(
        AnalyzeOptions {
            compare_models: true,
            show_details: true,
        },
    );
    match state.submit(&input) {
        FormOutcome::Result(analysis) => {
            let view = ResultView::new(&analysis);
            assert_eq!(view.headline, "Sentimen: POSITIF");
            assert!(view.confidence.starts_with("Tingkat Keyakinan: Tinggi ("));

            let details = view.details.expect("details requested");
            assert_eq!(details[0].1, "Keren, aktingnya mantap sekali");
            assert_eq!(details[1].1, "keren aktingnya mantap sekali");
            assert_eq!(details[3].1, "keren akting mantap sekali");
        }
        other => panic!("expected a result, got {other:?}"),
    }

    match state.submit(&FormInput::new(app::select_example(0).unwrap_or_default())) {
        FormOutcome::Warning(message) => assert_eq!(message, app::EMPTY_INPUT_WARNING),
        other => panic!("expected a warning, got {other:?}"),
    }
}
