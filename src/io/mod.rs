//! I/O operations for onepdf.
//!
//! This module handles the byte boundary of the system:
//! - File handles delivered by the host (in memory or on disk)
//! - Writing delivered artifacts to disk
//!
//! # Examples
//!
//! ```no_run
//! use onepdf::io::{ArtifactWriter, DiskFile, FileHandle};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = DiskFile::new("input.pdf");
//! let bytes = file.read_all().await?;
//!
//! let writer = ArtifactWriter::new();
//! writer.write(bytes, Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod source;
pub mod writer;

pub use source::{DiskFile, FileHandle, MemoryFile, declared_type_for_path};
pub use writer::{ArtifactWriter, WriteStatistics};
