//! onepdf - Collect, reorder and merge PDF files into a single document.
//!
//! A merge session keeps an ordered list of user-selected files, lets the
//! user reorder it with drag gestures, and concatenates every page of every
//! file, in list order, into one downloadable PDF:
//!
//! - Type-filtered ingestion from a picker or a drop zone
//! - A drag-and-drop reorder state machine
//! - Sequential, all-or-nothing page transplant
//! - Download plus best-effort preview delivery
//!
//! # Examples
//!
//! ```no_run
//! use onepdf::delivery::{Delivery, DirectorySink};
//! use onepdf::ingest::IngestSource;
//! use onepdf::io::{DiskFile, FileHandle};
//! use onepdf::reorder::DragEvent;
//! use onepdf::session::Session;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::default();
//! let handles: Vec<Arc<dyn FileHandle>> = vec![
//!     Arc::new(DiskFile::new("a.pdf")),
//!     Arc::new(DiskFile::new("b.pdf")),
//! ];
//! session.ingest(IngestSource::Picker, handles)?;
//!
//! // Drop b.pdf onto a.pdf
//! let ids = session.registry().ids();
//! session.drag(DragEvent::Start(ids[1]));
//! session.drag(DragEvent::End { active: ids[1], over: Some(ids[0]) });
//!
//! let delivery = Delivery::new(Arc::new(DirectorySink::new(".")), "merged.pdf");
//! match session.merge_and_deliver(&delivery).await {
//!     Ok(outcome) => println!("{} pages", outcome.statistics.total_pages),
//!     Err(notice) => eprintln!("{notice}"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod host;
pub mod ingest;
pub mod io;
pub mod merge;
pub mod output;
pub mod registry;
pub mod reorder;
pub mod session;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::SessionConfig;
pub use error::{OnePdfError, Result};
pub use session::{Session, UserNotice};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
