//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::app::{self, ResultView};
use crate::cli::args::{OutputFormat, SentimenArgs};
use crate::error::Result;
use crate::pipeline::Analysis;

/// Types with a human-readable rendering.
///
/// The default rendering lists the top-level fields of the JSON form.
pub trait HumanOutput: Serialize {
    fn human_lines(&self) -> Result<Vec<String>> {
        let value = serde_json::to_value(self)?;
        Ok(generic_lines(&value))
    }
}

/// One entry of the example selector.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleEntry {
    pub index: usize,
    pub text: String,
}

/// The example selector.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleList {
    pub label: String,
    pub examples: Vec<ExampleEntry>,
}

/// One line of a batch run.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub line: usize,
    pub review: String,
    pub analysis: Option<Analysis>,
    pub error: Option<String>,
}

/// Result structure for batch analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Summary of the loaded artifacts.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectReport {
    pub artifact_dir: String,
    pub vocabulary_size: usize,
    pub ngram_range: (usize, usize),
    pub norm: String,
    pub voting: String,
    pub estimators: Vec<String>,
    pub weights: Option<Vec<f64>>,
    pub bernoulli_nb_features: usize,
    pub linear_svm_features: usize,
    pub linear_svm_calibrated: bool,
    pub preprocessing: String,
}

/// Result structure for artifact conversion.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionResult {
    pub output_dir: String,
    pub encoding: String,
    pub files: Vec<String>,
    pub duration_ms: u64,
}

impl HumanOutput for InspectReport {}
impl HumanOutput for ConversionResult {}

impl HumanOutput for Analysis {
    fn human_lines(&self) -> Result<Vec<String>> {
        Ok(analysis_lines(&ResultView::new(self)))
    }
}

impl HumanOutput for ExampleList {
    fn human_lines(&self) -> Result<Vec<String>> {
        let mut lines = vec![self.label.clone()];
        lines.extend(
            self.examples
                .iter()
                .map(|entry| format!("  [{}] {}", entry.index, entry.text)),
        );
        Ok(lines)
    }
}

impl HumanOutput for BatchReport {
    fn human_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for item in &self.items {
            match (&item.analysis, &item.error) {
                (Some(analysis), _) => lines.push(format!(
                    "{:>4}  {:<8} {:>6}  {}",
                    item.line,
                    app::sentiment_label(analysis.label),
                    app::percent(analysis.confidence.percent),
                    item.review
                )),
                (None, Some(error)) => {
                    lines.push(format!("{:>4}  {:<8} {:>6}  {}", item.line, "-", "-", error))
                }
                (None, None) => {}
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "Total: {}  Positif: {}  Negatif: {}  Gagal: {}  ({}ms)",
            self.total, self.positive, self.negative, self.failed, self.duration_ms
        ));
        Ok(lines)
    }
}

/// Output a result in the specified format.
pub fn output_result<T: HumanOutput>(message: &str, result: &T, args: &SentimenArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &SentimenArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    for line in result.human_lines()? {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SentimenArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Page title and subtitle, shown in human mode only.
pub fn print_page_header(args: &SentimenArgs) {
    if args.output_format == OutputFormat::Human && args.verbosity() > 0 {
        println!("{}", app::PAGE_TITLE);
        println!("{}", underline(app::PAGE_TITLE, '═'));
        println!("{}", app::PAGE_SUBTITLE);
        println!();
    }
}

/// Render a result view as lines.
pub fn analysis_lines(view: &ResultView) -> Vec<String> {
    let mut lines = vec![
        view.heading.clone(),
        underline(&view.heading, '─'),
        view.headline.clone(),
        view.confidence.clone(),
        String::new(),
        "Probabilitas:".to_string(),
    ];
    lines.extend(
        view.probabilities
            .iter()
            .map(|(label, value)| format!("  {label:<8} {value:>6}")),
    );

    if let Some(comparison) = &view.comparison {
        lines.push(String::new());
        lines.push("Perbandingan model:".to_string());
        lines.extend(
            comparison
                .iter()
                .map(|(model, label)| format!("  {model:<12} {label}")),
        );
    }

    if let Some(details) = &view.details {
        lines.push(String::new());
        lines.push("Detail preprocessing:".to_string());
        lines.extend(
            details
                .iter()
                .map(|(step, text)| format!("  {step:<20} {text}")),
        );
    }

    lines
}

fn underline(text: &str, ch: char) -> String {
    std::iter::repeat_n(ch, text.chars().count()).collect()
}

fn generic_lines(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}: {}", format_value(val)))
            .collect(),
        _ => vec![format_value(value)],
    }
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{Probabilities, Sentiment};
    use crate::pipeline::{Confidence, ModelComparison};

    fn analysis() -> Analysis {
        let probabilities = Probabilities {
            negative: 0.3,
            positive: 0.7,
        };
        Analysis {
            review: "Keren, aktingnya mantap sekali".to_string(),
            label: Sentiment::Positive,
            confidence: Confidence::from_probabilities(&probabilities),
            probabilities,
            comparison: Some(ModelComparison {
                bernoulli_nb: Sentiment::Positive,
                linear_svm: Sentiment::Positive,
            }),
            details: None,
        }
    }

    #[test]
    fn test_analysis_lines() {
        let lines = analysis().human_lines().unwrap();

        assert_eq!(lines[0], "Hasil Analisis (Ensemble)");
        assert_eq!(lines[2], "Sentimen: POSITIF");
        assert_eq!(lines[3], "Tingkat Keyakinan: Sedang (70.0%)");
        assert!(lines.contains(&"  Negatif   30.0%".to_string()));
        assert!(lines.contains(&"  Positif   70.0%".to_string()));
        assert!(lines.contains(&"Perbandingan model:".to_string()));
        assert!(!lines.contains(&"Detail preprocessing:".to_string()));
    }

    #[test]
    fn test_batch_lines() {
        let report = BatchReport {
            items: vec![
                BatchItem {
                    line: 1,
                    review: "Keren".to_string(),
                    analysis: Some(analysis()),
                    error: None,
                },
                BatchItem {
                    line: 2,
                    review: String::new(),
                    analysis: None,
                    error: Some("Masukkan teks terlebih dahulu.".to_string()),
                },
            ],
            total: 2,
            positive: 1,
            negative: 0,
            failed: 1,
            duration_ms: 3,
        };

        let lines = report.human_lines().unwrap();
        assert_eq!(lines[0], "   1  POSITIF   70.0%  Keren");
        assert!(lines[1].ends_with("Masukkan teks terlebih dahulu."));
        assert_eq!(
            lines.last().unwrap(),
            "Total: 2  Positif: 1  Negatif: 0  Gagal: 1  (3ms)"
        );
    }

    #[test]
    fn test_generic_lines() {
        let result = ConversionResult {
            output_dir: "out".to_string(),
            encoding: "bincode".to_string(),
            files: vec!["a.bin".to_string(), "b.bin".to_string()],
            duration_ms: 1,
        };
        let lines = result.human_lines().unwrap();
        assert!(lines.contains(&"output_dir: out".to_string()));
        assert!(lines.contains(&"files: [a.bin, b.bin]".to_string()));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(&serde_json::Value::String("test".to_string())),
            "test"
        );
        assert_eq!(
            format_value(&serde_json::Value::Number(serde_json::Number::from(42))),
            "42"
        );
        assert_eq!(format_value(&serde_json::Value::Bool(false)), "false");
        assert_eq!(format_value(&serde_json::Value::Null), "null");
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline("Film", '═'), "════");
    }
}
