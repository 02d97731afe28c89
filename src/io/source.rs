//! Byte-bearing file handles.
//!
//! A [`FileHandle`] is what a host surface (file picker, drop target) hands
//! to ingestion: a display name, a declared content type, and a way to read
//! the full contents. Nothing is read until a merge asks for it.

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::PDF_MIME_TYPE;

/// Declared type for files whose content type is unknown.
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Capability interface over a host-provided file.
pub trait FileHandle: Send + Sync + fmt::Debug {
    /// Display name of the file, as the user picked it.
    fn name(&self) -> &str;

    /// Content type declared by the host. Not authoritative.
    fn declared_type(&self) -> &str;

    /// Read the whole file into memory.
    fn read_all(&self) -> BoxFuture<'_, io::Result<Bytes>>;
}

/// A file whose contents are already in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    declared_type: String,
    bytes: Bytes,
}

impl MemoryFile {
    /// Create an in-memory file with an explicit declared type.
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Create an in-memory file declared as `application/pdf`.
    pub fn pdf(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(name, PDF_MIME_TYPE, bytes)
    }
}

impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_type(&self) -> &str {
        &self.declared_type
    }

    fn read_all(&self) -> BoxFuture<'_, io::Result<Bytes>> {
        futures::future::ready(Ok(self.bytes.clone())).boxed()
    }
}

/// A file on the local filesystem.
///
/// The declared type comes from the extension, the way a browser derives
/// `File.type`; the contents are only read by [`FileHandle::read_all`].
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    declared_type: &'static str,
}

impl DiskFile {
    /// Wrap a path. Performs no I/O.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared_type = declared_type_for_path(&path);

        Self {
            path,
            name,
            declared_type,
        }
    }

    /// Path to the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_type(&self) -> &str {
        self.declared_type
    }

    fn read_all(&self) -> BoxFuture<'_, io::Result<Bytes>> {
        async move { tokio::fs::read(&self.path).await.map(Bytes::from) }.boxed()
    }
}

/// Derive a declared content type from a file extension.
pub fn declared_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
        _ => OCTET_STREAM_MIME_TYPE,
    }
}
