//! Writing delivered artifacts to disk.
//!
//! Writes are atomic: the bytes land in a uniquely named temp file beside
//! the target, which is then persisted over the target. A failed write
//! removes its temp file, so no partial artifact is ever left behind.

use bytes::Bytes;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{OnePdfError, Result};
use crate::utils::format_file_size;

const BUFFER_SIZE: usize = 8192;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Atomic byte writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write `bytes` to `path` and return statistics about the operation.
    ///
    /// The bytes are written exactly as given. An existing file at `path`
    /// is replaced; other files in the directory are never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Write or persist fails
    pub async fn write(&self, bytes: Bytes, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || {
            let start = Instant::now();

            let dir = match path_buf.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };

            let mut temp = tempfile::Builder::new()
                .prefix(".onepdf-")
                .suffix(".part")
                .tempfile_in(&dir)
                .map_err(|e| OnePdfError::FailedToCreateOutput {
                    path: path_buf.clone(),
                    source: e,
                })?;

            {
                let mut writer = BufWriter::with_capacity(BUFFER_SIZE, &mut temp);
                writer
                    .write_all(&bytes)
                    .and_then(|_| writer.flush())
                    .map_err(|e| OnePdfError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    })?;
            }

            // A failed persist hands the temp file back inside the error,
            // dropping it there unlinks it.
            temp.persist(&path_buf)
                .map_err(|e| OnePdfError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e.error,
                })?;

            Ok::<_, OnePdfError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await?
    }
}
