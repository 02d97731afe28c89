//! Configuration module for onepdf.
//!
//! A [`SessionConfig`] holds every tunable that shapes a merge session:
//! - The MIME type admitted at ingestion
//! - The minimum selection size for a merge
//! - Compression applied to the merged output
//! - The download filename and the preview delay
//!
//! Configs can be built in code, deserialized from JSON, or derived from the
//! command line by the `onepdf` binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{OnePdfError, Result};

/// MIME type of PDF documents.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Default filename of the downloaded artifact.
pub const DEFAULT_DOWNLOAD_NAME: &str = "merged.pdf";

/// Fewest entries a user-initiated merge accepts.
pub const DEFAULT_MIN_SELECTION: usize = 2;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - streams are written as transplanted.
    None,
    /// Flate-compress streams.
    #[default]
    Standard,
    /// Compress and prune unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = OnePdfError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(OnePdfError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Complete configuration for one merge session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Declared content type admitted at ingestion. Only `application/pdf`
    /// passes validation.
    pub accepted_type: String,

    /// Fewest entries a merge accepts. May be raised above two, never lowered.
    pub min_selection: usize,

    /// Compression level for the merged document.
    pub compression: CompressionLevel,

    /// Filename of the downloaded artifact.
    pub download_name: String,

    /// Delay between the download and the preview, in milliseconds.
    pub preview_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accepted_type: PDF_MIME_TYPE.to_string(),
            min_selection: DEFAULT_MIN_SELECTION,
            compression: CompressionLevel::default(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            preview_delay_ms: 0,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OnePdfError::invalid_config(format!("Malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            OnePdfError::invalid_config(format!(
                "Cannot read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Delay before the best-effort preview is opened.
    pub fn preview_delay(&self) -> Duration {
        Duration::from_millis(self.preview_delay_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The accepted type is anything but `application/pdf`
    /// - The minimum selection is below [`DEFAULT_MIN_SELECTION`]
    /// - The download name is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if !self.accepted_type.trim().eq_ignore_ascii_case(PDF_MIME_TYPE) {
            return Err(OnePdfError::invalid_config(format!(
                "Accepted type must be {PDF_MIME_TYPE}, got: {:?}",
                self.accepted_type
            )));
        }

        if self.min_selection < DEFAULT_MIN_SELECTION {
            return Err(OnePdfError::invalid_config(format!(
                "Minimum selection must be at least {DEFAULT_MIN_SELECTION}"
            )));
        }

        let name = self.download_name.trim();
        if name.is_empty() {
            return Err(OnePdfError::invalid_config("Download name cannot be empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(OnePdfError::invalid_config(format!(
                "Download name must be a bare filename: {name}"
            )));
        }

        Ok(())
    }
}
