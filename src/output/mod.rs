//! Output formatting and display for the onepdf host.
//!
//! This module handles all user-facing output:
//! - Formatted status messages
//! - The current file order
//! - Merge and delivery summaries
//! - Quiet and verbose modes
//!
//! Library diagnostics go through `tracing`; only the host prints.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::ingest::IngestReport;
use crate::registry::Registry;
use crate::session::MergeOutcome;

/// Display the result of an ingestion batch.
pub fn display_ingest_report(formatter: &OutputFormatter, report: &IngestReport) {
    if report.rejected > 0 {
        formatter.warning(&format!(
            "Skipped {} file(s) that are not PDFs",
            report.rejected
        ));
    }

    formatter.debug(&format!(
        "Added {} file(s) from {}",
        report.admitted.len(),
        report.source
    ));
}

/// Display the registry order, 1-based.
pub fn display_order(formatter: &OutputFormatter, registry: &Registry) {
    formatter.section(&format!("{} file(s) in merge order:", registry.len()));
    for (idx, entry) in registry.iter().enumerate() {
        formatter.list_item(idx + 1, entry.original_name());
    }
}

/// Display a completed merge and its delivery.
pub fn display_outcome(formatter: &OutputFormatter, outcome: &MergeOutcome) {
    let stats = &outcome.statistics;

    formatter.success(&format!(
        "Merged {} documents ({} pages) into {}",
        stats.files_merged,
        stats.total_pages,
        outcome.delivery.download.display()
    ));
    formatter.detail("Size", &stats.format_output_size());
    formatter.detail("Time", &format!("{:.2}s", stats.merge_time.as_secs_f64()));
    if outcome.delivery.preview_opened {
        formatter.detail("Preview", "opened");
    }
}
