//! Handing a merged artifact to the user.
//!
//! Delivery is a pure consumer of a [`MergeResult`]: the bytes go to a
//! [`DownloadSink`] under the configured filename, then the very same bytes
//! are staged behind a [`PreviewHandle`] for a best-effort [`Previewer`].
//!
//! System viewers return as soon as they launch, long before they read the
//! file. A handle whose preview opened is therefore retained by the
//! [`Delivery`] until the next preview replaces it, until
//! [`Delivery::release_preview`] is called, or until the last clone of the
//! delivery is dropped. A handle whose preview failed is released at once.

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempPath;
use tokio::task;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::io::ArtifactWriter;
use crate::merge::MergeResult;

/// Destination for the downloadable artifact.
pub trait DownloadSink: Send + Sync {
    /// Store `bytes` under `file_name` and return where they landed.
    fn save<'a>(&'a self, file_name: &'a str, bytes: Bytes) -> BoxFuture<'a, Result<PathBuf>>;
}

/// Best-effort viewer for a delivered artifact.
pub trait Previewer: Send + Sync {
    /// Open the artifact at `path`. Failures are never shown to the user.
    fn open<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<()>>;
}

/// Writes downloads into a directory, atomically.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    writer: ArtifactWriter,
}

impl DirectorySink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: ArtifactWriter::new(),
        }
    }
}

impl DownloadSink for DirectorySink {
    fn save<'a>(&'a self, file_name: &'a str, bytes: Bytes) -> BoxFuture<'a, Result<PathBuf>> {
        async move {
            let stats = self.writer.write(bytes, &self.dir.join(file_name)).await?;
            debug!(
                path = %stats.output_path.display(),
                size = %stats.format_file_size(),
                "Wrote download"
            );
            Ok(stats.output_path)
        }
        .boxed()
    }
}

/// Keeps downloads in memory, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    downloads: Mutex<Vec<(String, Bytes)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every download received so far, oldest first.
    pub fn downloads(&self) -> Vec<(String, Bytes)> {
        self.downloads
            .lock()
            .map(|downloads| downloads.clone())
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save<'a>(&'a self, file_name: &'a str, bytes: Bytes) -> BoxFuture<'a, Result<PathBuf>> {
        if let Ok(mut downloads) = self.downloads.lock() {
            downloads.push((file_name.to_string(), bytes));
        }
        futures::future::ready(Ok(PathBuf::from(file_name))).boxed()
    }
}

/// Opens artifacts with the platform's default viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPreviewer;

impl Previewer for SystemPreviewer {
    fn open<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<()>> {
        async move {
            let mut command = opener_command();
            command.arg(path);
            let status = command.status().await?;
            if status.success() {
                Ok(())
            } else {
                Err(io::Error::other(format!("viewer exited with {status}")))
            }
        }
        .boxed()
    }
}

#[cfg(target_os = "macos")]
fn opener_command() -> tokio::process::Command {
    tokio::process::Command::new("open")
}

#[cfg(target_os = "windows")]
fn opener_command() -> tokio::process::Command {
    let mut command = tokio::process::Command::new("cmd");
    command.args(["/C", "start", ""]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command() -> tokio::process::Command {
    tokio::process::Command::new("xdg-open")
}

/// Temporary reference to an artifact, removed when released.
#[derive(Debug)]
pub struct PreviewHandle {
    path: TempPath,
}

impl PreviewHandle {
    /// Stage `bytes` in a fresh temporary `.pdf` file.
    pub async fn stage(bytes: Bytes) -> Result<Self> {
        let path = task::spawn_blocking(move || -> io::Result<TempPath> {
            let mut file = tempfile::Builder::new()
                .prefix("onepdf-preview-")
                .suffix(".pdf")
                .tempfile()?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await??;

        Ok(Self { path })
    }

    /// Location of the staged artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged artifact.
    pub fn release(self) -> io::Result<()> {
        self.path.close()
    }
}

/// Outcome of delivering one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Where the download landed.
    pub download: PathBuf,
    /// Size of the delivered artifact in bytes.
    pub size: u64,
    /// Whether the preview opened.
    pub preview_opened: bool,
}

/// Download-plus-preview delivery of merge results.
///
/// Clones share the retained preview handle.
#[derive(Clone)]
pub struct Delivery {
    sink: Arc<dyn DownloadSink>,
    previewer: Option<Arc<dyn Previewer>>,
    download_name: String,
    preview_delay: Duration,
    retained: Arc<Mutex<Option<PreviewHandle>>>,
}

impl Delivery {
    /// Create a delivery writing downloads to `sink` as `download_name`,
    /// without a preview.
    pub fn new(sink: Arc<dyn DownloadSink>, download_name: impl Into<String>) -> Self {
        Self {
            sink,
            previewer: None,
            download_name: download_name.into(),
            preview_delay: Duration::ZERO,
            retained: Arc::default(),
        }
    }

    /// Open a preview after each download, `delay` after the download
    /// completes.
    pub fn with_preview(mut self, previewer: Arc<dyn Previewer>, delay: Duration) -> Self {
        self.previewer = Some(previewer);
        self.preview_delay = delay;
        self
    }

    /// Filename used for downloads.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Path of the preview file currently held open for the viewer.
    pub fn retained_preview(&self) -> Option<PathBuf> {
        self.retained
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|handle| handle.path().to_path_buf()))
    }

    /// Release the retained preview file, if any.
    pub fn release_preview(&self) -> io::Result<()> {
        match self.take_retained() {
            Some(handle) => handle.release(),
            None => Ok(()),
        }
    }

    fn take_retained(&self) -> Option<PreviewHandle> {
        self.retained.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Hold `handle` for the viewer, handing back the one it replaces.
    fn retain(&self, handle: PreviewHandle) -> Option<PreviewHandle> {
        match self.retained.lock() {
            Ok(mut slot) => slot.replace(handle),
            Err(_) => Some(handle),
        }
    }

    /// Deliver `result`: download, then best-effort preview.
    ///
    /// # Errors
    ///
    /// Returns an error only if the download fails. Preview failures are
    /// logged and reported as `preview_opened: false`.
    pub async fn deliver(&self, result: &MergeResult) -> Result<DeliveryReport> {
        let bytes = result.bytes().clone();
        let size = bytes.len() as u64;

        let download = self.sink.save(&self.download_name, bytes.clone()).await?;
        info!(path = %download.display(), size, "Delivered merged PDF");

        let preview_opened = match &self.previewer {
            Some(previewer) => self.preview(previewer.as_ref(), bytes).await,
            None => false,
        };

        Ok(DeliveryReport {
            download,
            size,
            preview_opened,
        })
    }

    async fn preview(&self, previewer: &dyn Previewer, bytes: Bytes) -> bool {
        let handle = match PreviewHandle::stage(bytes).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Could not stage preview");
                return false;
            }
        };

        if !self.preview_delay.is_zero() {
            tokio::time::sleep(self.preview_delay).await;
        }

        let (opened, stale) = match previewer.open(handle.path()).await {
            Ok(()) => {
                debug!(path = %handle.path().display(), "Retaining preview file");
                (true, self.retain(handle))
            }
            Err(e) => {
                warn!(error = %e, "Preview did not open");
                (false, Some(handle))
            }
        };

        if let Err(e) = stale.map_or(Ok(()), PreviewHandle::release) {
            warn!(error = %e, "Could not release preview file");
        }

        opened
    }
}
