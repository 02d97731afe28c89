//! Error types for onepdf.
//!
//! This module defines all error types that can occur while collecting,
//! reordering, merging and delivering PDF documents.
//!
//! # Error Categories
//!
//! - **Selection Errors**: too few documents selected for a merge
//! - **Busy Errors**: the registry is frozen by a drag gesture or a merge
//! - **PDF Errors**: unreadable, undecodable or encrypted entries
//! - **Output Errors**: serialization and download failures
//!
//! Every merge-path error is collapsed into one uniform [`UserNotice`] at the
//! session boundary. The variants keep the offending entry's name so logs
//! can point at it.
//!
//! [`UserNotice`]: crate::session::UserNotice

use std::io;
use std::path::PathBuf;

/// Result type alias for onepdf operations.
pub type Result<T> = std::result::Result<T, OnePdfError>;

/// Main error type for onepdf operations.
#[derive(Debug, thiserror::Error)]
pub enum OnePdfError {
    /// Fewer documents than the merge minimum are selected.
    #[error("Select at least {required} PDFs (currently {actual} selected)")]
    InsufficientSelection {
        /// Minimum number of entries required.
        required: usize,
        /// Number of entries present.
        actual: usize,
    },

    /// A drag gesture is active; the registry cannot change membership.
    #[error("Cannot modify the file list while a drag is in progress")]
    DragInProgress,

    /// A merge is in flight; the registry is frozen until it resolves.
    #[error("A merge is already in progress")]
    MergeInFlight,

    /// Reading an entry's payload failed.
    #[error("Failed to read '{name}'\n  Reason: {source}")]
    ReadFailed {
        /// Display name of the entry.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An entry's bytes could not be decoded as a PDF document.
    #[error("Failed to decode PDF '{name}'\n  Reason: {reason}")]
    DecodeFailed {
        /// Display name of the entry.
        name: String,
        /// Reason reported by the PDF parser.
        reason: String,
    },

    /// An entry is encrypted; encrypted documents are not supported.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Display name of the entry.
        name: String,
    },

    /// The page transplant left the accumulator in an invalid state.
    #[error("Failed to transplant pages from '{name}'\n  Reason: {reason}")]
    TransplantFailed {
        /// Display name of the entry.
        name: String,
        /// Details about the failure.
        reason: String,
    },

    /// The merged document could not be serialized.
    #[error("Failed to serialize merged PDF: {reason}")]
    SerializeFailed {
        /// Details about the failure.
        reason: String,
    },

    /// A blocking worker task panicked or was aborted.
    #[error("Background task failed: {reason}")]
    Worker {
        /// Details about the failure.
        reason: String,
    },

    /// The merge was cancelled before it produced an artifact.
    #[error("Merge cancelled")]
    Cancelled,

    /// Failed to create the download file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the download file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl OnePdfError {
    /// Create a DecodeFailed error.
    pub fn decode_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create a TransplantFailed error.
    pub fn transplant_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TransplantFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializeFailed error.
    pub fn serialize_failed(reason: impl Into<String>) -> Self {
        Self::SerializeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error belongs to the uniform "merge failed" bucket.
    ///
    /// These are the failures a user only ever sees as
    /// "Failed to merge. Please try again.".
    pub fn is_merge_failure(&self) -> bool {
        matches!(
            self,
            Self::ReadFailed { .. }
                | Self::DecodeFailed { .. }
                | Self::EncryptedPdf { .. }
                | Self::TransplantFailed { .. }
                | Self::SerializeFailed { .. }
                | Self::Worker { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Io { .. }
        )
    }

    /// Check if the operation was refused because the registry is frozen.
    ///
    /// The caller is expected to disable the affordance and retry later.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::DragInProgress | Self::MergeInFlight)
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InsufficientSelection { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::DragInProgress | Self::MergeInFlight => 1,
            Self::ReadFailed { .. } => 2,
            Self::DecodeFailed { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::TransplantFailed { .. } => 6,
            Self::SerializeFailed { .. } => 6,
            Self::Worker { .. } => 6,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}

impl From<tokio::task::JoinError> for OnePdfError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker {
            reason: err.to_string(),
        }
    }
}
