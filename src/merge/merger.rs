//! Core PDF merging implementation.
//!
//! Entries are processed strictly in order: read, decode, transplant. The
//! first failure aborts the merge; there is no partial output.

use bytes::Bytes;
use lopdf::Document;
use std::time::{Duration, Instant};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{CompressionLevel, PDF_MIME_TYPE};
use crate::error::{OnePdfError, Result};
use crate::merge::pages::PageAccumulator;
use crate::registry::FileEntry;
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the input payloads.
    pub input_size: u64,

    /// Size of the serialized output.
    pub output_size: u64,

    /// Total time taken for the merge.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// The serialized output of one merge.
#[derive(Debug, Clone)]
pub struct MergeResult {
    bytes: Bytes,
    statistics: MergeStatistics,
}

impl MergeResult {
    /// Serialized PDF bytes. Cheap to clone, never mutated.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Content type of the artifact.
    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    /// Statistics about the merge.
    pub fn statistics(&self) -> &MergeStatistics {
        &self.statistics
    }
}

/// Merge engine concatenating the pages of ordered entries.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    compression: CompressionLevel,
}

impl Merger {
    /// Create a merger writing output at the given compression level.
    pub fn new(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Merge `entries`, in order, into a single serialized PDF.
    ///
    /// Fewer than two entries are accepted: no entries yields an empty
    /// document, one entry yields that document's pages. The token is checked
    /// before each entry and before serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An entry cannot be read
    /// - An entry is not a decodable, unencrypted PDF
    /// - Serialization fails
    /// - The token was cancelled
    pub async fn merge(
        &self,
        entries: &[FileEntry],
        cancel: &CancellationToken,
    ) -> Result<MergeResult> {
        let merge_start = Instant::now();
        let mut accumulator = PageAccumulator::new();
        let mut input_size = 0;

        for (idx, entry) in entries.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(processed = idx, "Merge cancelled");
                return Err(OnePdfError::Cancelled);
            }

            let name = entry.original_name();
            let bytes = entry.read_bytes().await?;
            input_size += bytes.len() as u64;

            let document = decode(name, bytes).await?;
            let pages = accumulator.append_document(document, name)?;

            debug!(
                entry = %entry.id(),
                name,
                pages,
                "[{}/{}] Transplanted pages",
                idx + 1,
                entries.len()
            );
        }

        if cancel.is_cancelled() {
            return Err(OnePdfError::Cancelled);
        }

        let total_pages = accumulator.page_count();
        let bytes = serialize(accumulator.finish(), self.compression).await?;

        let statistics = MergeStatistics {
            files_merged: entries.len(),
            total_pages,
            input_size,
            output_size: bytes.len() as u64,
            merge_time: merge_start.elapsed(),
        };

        info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            size = %statistics.format_output_size(),
            elapsed_ms = statistics.merge_time.as_millis() as u64,
            "Merged documents"
        );

        Ok(MergeResult { bytes, statistics })
    }
}

/// Decode bytes into a document on a blocking worker.
async fn decode(name: &str, bytes: Bytes) -> Result<Document> {
    let name = name.to_string();

    task::spawn_blocking(move || {
        let document = Document::load_mem(&bytes).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                OnePdfError::encrypted_pdf(name.clone())
            } else {
                OnePdfError::decode_failed(name.clone(), err_msg)
            }
        })?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(OnePdfError::encrypted_pdf(name));
        }

        Ok(document)
    })
    .await?
}

/// Serialize the accumulated document on a blocking worker.
async fn serialize(mut document: Document, compression: CompressionLevel) -> Result<Bytes> {
    task::spawn_blocking(move || {
        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                document.compress();
            }
            CompressionLevel::Maximum => {
                document.prune_objects();
                document.compress();
            }
        }

        // Always renumber for consistency
        document.renumber_objects();

        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|e| OnePdfError::serialize_failed(e.to_string()))?;

        Ok(Bytes::from(buffer))
    })
    .await?
}
