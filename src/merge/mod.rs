//! PDF merging operations.
//!
//! This module implements the merge engine:
//! - Sequential decode of ordered entries
//! - Page transplant into a fresh accumulator document
//! - Serialization with configurable compression
//!
//! # Examples
//!
//! ```no_run
//! use onepdf::config::CompressionLevel;
//! use onepdf::merge::Merger;
//! use onepdf::registry::FileEntry;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(entries: Vec<FileEntry>) -> Result<(), Box<dyn std::error::Error>> {
//! let merger = Merger::new(CompressionLevel::Standard);
//! let result = merger.merge(&entries, &CancellationToken::new()).await?;
//! println!("Merged {} pages", result.statistics().total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod pages;

pub use merger::{MergeResult, MergeStatistics, Merger};
pub use pages::PageAccumulator;
