//! Command implementations for the sentimen CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info, warn};

use crate::app::{self, AppState, FormInput, FormOutcome};
use crate::artifacts::{self, ArtifactCache, Encoding};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AppConfig;
use crate::error::{Result, SentimenError};
use crate::ml::{Classifier, Sentiment};
use crate::pipeline::{AnalyzeOptions, Predictor};

/// Execute a CLI command.
pub fn execute_command(args: SentimenArgs) -> Result<()> {
    let config = args.app_config()?;
    debug!("Effective configuration: {config:?}");

    match &args.command {
        Command::Examples => list_examples(&args),
        Command::Analyze(analyze_args) => analyze_review(analyze_args, &config, &args),
        Command::Batch(batch_args) => run_batch(batch_args, &config, &args),
        Command::Interactive(interactive_args) => run_interactive(interactive_args, &config, &args),
        Command::Inspect => inspect_artifacts(&config, &args),
        Command::Convert(convert_args) => convert_artifacts(convert_args, &config, &args),
    }
}

/// Load the artifacts once and decide the application state.
///
/// In degraded mode the notice is printed and the load error returned, so
/// no command that needs the models can proceed.
fn ready_predictor(config: &AppConfig) -> Result<Predictor> {
    let cache = ArtifactCache::new(config.artifact_config());
    let state = AppState::load(&cache);

    match state {
        AppState::Ready(predictor) => Ok(predictor),
        AppState::Degraded(error) => {
            eprintln!("{}", app::MISSING_ARTIFACTS_MESSAGE);
            Err(SentimenError::Load(error))
        }
    }
}

/// Toggle flags override the configured defaults.
fn analyze_options(toggles: &ToggleArgs, config: &AppConfig) -> AnalyzeOptions {
    let defaults = config.analyze_options();
    AnalyzeOptions {
        compare_models: defaults.compare_models && !toggles.no_compare,
        show_details: defaults.show_details || toggles.details,
    }
}

/// List the example selector.
fn list_examples(cli_args: &SentimenArgs) -> Result<()> {
    let examples = app::selector_options()
        .into_iter()
        .enumerate()
        .map(|(index, text)| ExampleEntry {
            index,
            text: text.to_string(),
        })
        .collect();

    output_result(
        "Example reviews",
        &ExampleList {
            label: app::SELECTOR_LABEL.to_string(),
            examples,
        },
        cli_args,
    )
}

/// Text of the review to analyze: argument, then example, then stdin.
fn review_text(args: &AnalyzeArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(index) = args.example {
        return app::select_example(index)
            .map(str::to_string)
            .ok_or_else(|| {
                SentimenError::invalid_argument(format!(
                    "example {index} does not exist (choose 0-{})",
                    app::EXAMPLE_REVIEWS.len()
                ))
            });
    }

    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Analyze a single review.
fn analyze_review(args: &AnalyzeArgs, config: &AppConfig, cli_args: &SentimenArgs) -> Result<()> {
    let predictor = ready_predictor(config)?;
    let input = FormInput::new(review_text(args)?).with_options(analyze_options(&args.toggles, config));

    print_page_header(cli_args);
    match AppState::Ready(predictor).submit(&input) {
        FormOutcome::Result(analysis) => output_result("Review analyzed", analysis.as_ref(), cli_args),
        FormOutcome::Warning(message) => {
            eprintln!("{message}");
            Err(SentimenError::EmptyInput)
        }
        FormOutcome::Failure(message) => Err(SentimenError::other(message)),
        FormOutcome::Unavailable(message) => Err(SentimenError::other(message)),
    }
}

/// Read one review per line, keeping 1-based line numbers.
fn read_reviews(path: &Path, skip_blank: bool) -> Result<Vec<(usize, String)>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open review file {}", path.display()))?;

    let mut numbered = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line
            .with_context(|| format!("cannot read line {} of {}", line_num + 1, path.display()))?;
        if skip_blank && line.trim().is_empty() {
            continue;
        }
        numbered.push((line_num + 1, line));
    }
    Ok(numbered)
}

/// Analyze every line of a file.
fn run_batch(args: &BatchArgs, config: &AppConfig, cli_args: &SentimenArgs) -> Result<()> {
    let predictor = ready_predictor(config)?;
    let options = analyze_options(&args.toggles, config);

    if cli_args.verbosity() > 1 {
        println!("Reading reviews from: {}", args.input.display());
    }

    let numbered = read_reviews(&args.input, args.skip_blank)?;

    let start_time = Instant::now();
    let reviews: Vec<&str> = numbered.iter().map(|(_, line)| line.as_str()).collect();
    let results = match config.batch_threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SentimenError::config(format!("cannot build thread pool: {e}")))?
            .install(|| predictor.analyze_batch(&reviews, &options)),
        None => predictor.analyze_batch(&reviews, &options),
    };
    let duration = start_time.elapsed();

    let mut items = Vec::with_capacity(results.len());
    let (mut positive, mut negative, mut failed) = (0, 0, 0);
    for ((line, review), result) in numbered.into_iter().zip(results) {
        let item = match result {
            Ok(analysis) => {
                match analysis.label {
                    Sentiment::Positive => positive += 1,
                    Sentiment::Negative => negative += 1,
                }
                BatchItem {
                    line,
                    review,
                    analysis: Some(analysis),
                    error: None,
                }
            }
            Err(e) => {
                failed += 1;
                let error = match e {
                    SentimenError::EmptyInput => app::EMPTY_INPUT_WARNING.to_string(),
                    other => format!("Gagal menganalisis: {other}"),
                };
                warn!("line {line}: {error}");
                BatchItem {
                    line,
                    review,
                    analysis: None,
                    error: Some(error),
                }
            }
        };
        items.push(item);
    }

    info!("Analyzed {} reviews in {:?}", items.len(), duration);

    output_result(
        "Batch analysis completed",
        &BatchReport {
            total: items.len(),
            items,
            positive,
            negative,
            failed,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Read reviews from stdin until EOF, one analysis per line.
fn run_interactive(args: &InteractiveArgs, config: &AppConfig, cli_args: &SentimenArgs) -> Result<()> {
    let predictor = ready_predictor(config)?;
    let state = AppState::Ready(predictor);
    let options = analyze_options(&args.toggles, config);
    let prompt = cli_args.output_format == OutputFormat::Human && cli_args.verbosity() > 0;

    print_page_header(cli_args);
    if prompt {
        println!("{}", app::FORM_HEADING);
        println!("{} (Ctrl-D untuk keluar)", app::INPUT_LABEL);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if prompt {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match state.submit(&FormInput::new(line).with_options(options)) {
            FormOutcome::Result(analysis) => {
                output_result("Review analyzed", analysis.as_ref(), cli_args)?;
            }
            FormOutcome::Warning(message)
            | FormOutcome::Failure(message)
            | FormOutcome::Unavailable(message) => eprintln!("{message}"),
        }

        if prompt {
            println!();
        }
    }

    Ok(())
}

/// Summarize the loaded artifacts.
fn inspect_artifacts(config: &AppConfig, cli_args: &SentimenArgs) -> Result<()> {
    let predictor = ready_predictor(config)?;
    let bundle = predictor.bundle();
    let vectorizer = bundle.vectorizer();
    let ensemble = bundle.ensemble();

    output_result(
        "Artifacts loaded",
        &InspectReport {
            artifact_dir: config.artifact_dir.display().to_string(),
            vocabulary_size: vectorizer.dim(),
            ngram_range: vectorizer.ngram_range(),
            norm: format!("{:?}", vectorizer.norm()).to_lowercase(),
            voting: format!("{:?}", ensemble.voting()).to_lowercase(),
            estimators: ensemble
                .estimators()
                .iter()
                .map(|named| format!("{} ({})", named.name, named.estimator.name()))
                .collect(),
            weights: ensemble.weights().map(<[f64]>::to_vec),
            bernoulli_nb_features: bundle.bernoulli_nb().n_features(),
            linear_svm_features: bundle.linear_svm().n_features(),
            linear_svm_calibrated: bundle.linear_svm().calibration().is_some(),
            preprocessing: bundle.tools().description().to_string(),
        },
        cli_args,
    )
}

/// Re-encode the loaded artifacts into another directory.
fn convert_artifacts(args: &ConvertArgs, config: &AppConfig, cli_args: &SentimenArgs) -> Result<()> {
    let predictor = ready_predictor(config)?;
    let encoding = Encoding::from(args.to);

    if cli_args.verbosity() > 1 {
        println!(
            "Converting {} to {encoding} in {}",
            config.artifact_dir.display(),
            args.output_dir.display()
        );
    }

    let start_time = Instant::now();
    let written = artifacts::export_bundle(predictor.bundle(), &args.output_dir, encoding)?;

    output_result(
        "Artifacts converted",
        &ConversionResult {
            output_dir: args.output_dir.display().to_string(),
            encoding: encoding.to_string(),
            files: written.iter().map(|p| p.display().to_string()).collect(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}
