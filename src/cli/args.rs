//! Command line argument parsing for the sentimen CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactFormat, Encoding};
use crate::config::AppConfig;
use crate::error::Result;

/// Sentimen - Indonesian movie review sentiment analysis
#[derive(Parser, Debug, Clone)]
#[command(name = "sentimen")]
#[command(about = "Analisis Sentimen Film: BernoulliNB + linear SVM voting ensemble")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentimenArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the model, vectorizer and preprocessing artifacts
    #[arg(long = "artifacts", value_name = "DIR", env = "SENTIMEN_ARTIFACT_DIR", global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Artifact encodings to accept
    #[arg(long, value_name = "FORMAT", global = true)]
    pub artifact_format: Option<ArtifactFormatArg>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "SENTIMEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentimenArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Configuration file (if any) overlaid with command-line flags.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.artifact_dir {
            config.artifact_dir = dir.clone();
        }
        if let Some(format) = self.artifact_format {
            config.artifact_format = format.into();
        }

        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze one review
    Analyze(AnalyzeArgs),

    /// List the example reviews
    Examples,

    /// Analyze every line of a file
    Batch(BatchArgs),

    /// Read reviews from stdin, one per line
    Interactive(InteractiveArgs),

    /// Show what the loaded artifacts contain
    Inspect,

    /// Re-encode the artifacts as JSON or bincode
    Convert(ConvertArgs),
}

/// Toggles shared by the analyzing commands.
#[derive(Parser, Debug, Clone, Default)]
pub struct ToggleArgs {
    /// Skip the per-model comparison
    #[arg(long)]
    pub no_compare: bool,

    /// Show the intermediate preprocessing steps
    #[arg(short, long)]
    pub details: bool,
}

/// Arguments for analyzing a single review
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Review text (reads stdin when omitted and no example is chosen)
    #[arg(value_name = "TEXT", conflicts_with = "example")]
    pub text: Option<String>,

    /// Use example review N (1-6); 0 is manual entry
    #[arg(short, long, value_name = "N")]
    pub example: Option<usize>,

    #[command(flatten)]
    pub toggles: ToggleArgs,
}

/// Arguments for batch analysis
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File with one review per line
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Skip blank lines instead of reporting them
    #[arg(long)]
    pub skip_blank: bool,

    #[command(flatten)]
    pub toggles: ToggleArgs,
}

/// Arguments for interactive mode
#[derive(Parser, Debug, Clone)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub toggles: ToggleArgs,
}

/// Arguments for artifact conversion
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Directory to write the converted artifacts to
    #[arg(value_name = "OUT_DIR")]
    pub output_dir: PathBuf,

    /// Target encoding
    #[arg(long = "to", default_value = "bincode")]
    pub to: EncodingArg,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Artifact encodings accepted by the loader
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormatArg {
    /// JSON first, then bincode
    Auto,
    Json,
    Bincode,
}

impl From<ArtifactFormatArg> for ArtifactFormat {
    fn from(arg: ArtifactFormatArg) -> Self {
        match arg {
            ArtifactFormatArg::Auto => ArtifactFormat::Auto,
            ArtifactFormatArg::Json => ArtifactFormat::Json,
            ArtifactFormatArg::Bincode => ArtifactFormat::Bincode,
        }
    }
}

/// Artifact encodings that can be written
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingArg {
    Json,
    Bincode,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Json => Encoding::Json,
            EncodingArg::Bincode => Encoding::Bincode,
        }
    }
}
