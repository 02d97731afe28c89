//! CLI argument parsing for onepdf.
//!
//! The command line plays the part of the interactive surface: inputs are
//! the files the user picked, `--remove` and `--move` are the gestures they
//! made before pressing merge.
//!
//! # Examples
//!
//! ```no_run
//! use onepdf::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Collecting {} input patterns", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{CompressionLevel, SessionConfig};
use crate::error::{OnePdfError, Result};

/// Collect, reorder and merge PDF files into a single document.
#[derive(Parser, Debug)]
#[command(name = "onepdf")]
#[command(version)]
#[command(about = "Collect, reorder and merge PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files or glob patterns, in the order they are added
    ///
    /// Files without a .pdf extension are skipped.
    ///
    /// Examples:
    ///   onepdf cover.pdf chapter*.pdf
    ///   onepdf scans/*.pdf --move 3:1
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// JSON session config; flags override its fields
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the merged file is downloaded into
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Filename of the merged file [default: merged.pdf]
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Move the file at position FROM onto position TO (1-based)
    ///
    /// Applied in order, after removals, exactly like dragging the file
    /// onto another one in the list.
    #[arg(long = "move", value_name = "FROM:TO")]
    pub moves: Vec<MoveSpec>,

    /// Remove the file at position POS (1-based)
    ///
    /// Positions refer to the order before any removal.
    #[arg(long = "remove", value_name = "POS")]
    pub removals: Vec<usize>,

    /// Compression level for the merged file
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress and drop unreferenced objects
    #[arg(long, value_name = "LEVEL")]
    pub compression: Option<CompressionLevel>,

    /// Open the merged file with the system viewer
    #[arg(long)]
    pub preview: bool,

    /// Delay before opening the preview, in milliseconds
    #[arg(long, value_name = "MS", requires = "preview")]
    pub preview_delay: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// One `--move FROM:TO` gesture, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSpec {
    /// Position of the dragged file.
    pub from: usize,
    /// Position of the file it is dropped on.
    pub to: usize,
}

impl FromStr for MoveSpec {
    type Err = OnePdfError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OnePdfError::invalid_config(format!("Invalid move '{s}': expected FROM:TO"));

        let (from, to) = s.split_once(':').ok_or_else(invalid)?;
        let from: usize = from.trim().parse().map_err(|_| invalid())?;
        let to: usize = to.trim().parse().map_err(|_| invalid())?;
        if from == 0 || to == 0 {
            return Err(OnePdfError::invalid_config(format!(
                "Invalid move '{s}': positions start at 1"
            )));
        }

        Ok(Self { from, to })
    }
}

impl Cli {
    /// Build the session config: the `--config` file if given, else the
    /// defaults, with command-line flags applied on top.
    pub async fn session_config(&self) -> Result<SessionConfig> {
        let base = match &self.config {
            Some(path) => SessionConfig::load(path).await?,
            None => SessionConfig::default(),
        };
        self.apply_overrides(base)
    }

    /// Validate flags that need no I/O.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(OnePdfError::invalid_config("No input files specified"));
        }
        if self.removals.contains(&0) {
            return Err(OnePdfError::invalid_config("Positions start at 1"));
        }
        Ok(())
    }

    fn apply_overrides(&self, mut config: SessionConfig) -> Result<SessionConfig> {
        if let Some(name) = &self.output {
            config.download_name = name.clone();
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
        if let Some(delay) = self.preview_delay {
            config.preview_delay_ms = delay;
        }

        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Cli> for SessionConfig {
    type Error = OnePdfError;

    fn try_from(cli: &Cli) -> Result<Self> {
        cli.apply_overrides(SessionConfig::default())
    }
}
