//! The merge session: one owner for the registry and its controllers.
//!
//! A [`Session`] is created when the user starts assembling a document and
//! dropped when they are done. It enforces the rules that span components:
//!
//! - A merge needs at least `min_selection` entries
//! - Only one merge runs at a time
//! - The registry is frozen while a drag gesture or a merge is active
//!
//! Merges run as a detached [`MergeJob`] holding a snapshot of the registry,
//! so the session stays usable (and correctly refuses mutations) while the
//! job is awaited or spawned elsewhere.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::delivery::{Delivery, DeliveryReport};
use crate::error::{OnePdfError, Result};
use crate::ingest::{IngestReport, IngestSource, Ingestor};
use crate::io::FileHandle;
use crate::merge::{MergeResult, MergeStatistics, Merger};
use crate::registry::{EntryId, FileEntry, Registry};
use crate::reorder::{DragEvent, ReorderController, ReorderOutcome};

/// The uniform, user-facing outcome of a failed merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserNotice {
    /// Too few documents were selected; nothing was merged.
    SelectAtLeast {
        /// Minimum number of documents.
        required: usize,
    },
    /// Any read, decode, serialization or download failure.
    MergeFailed,
    /// The merge was cancelled before it produced an artifact.
    Cancelled,
    /// Another gesture or merge is active.
    Busy,
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectAtLeast { required } => write!(f, "Select at least {required} PDFs"),
            Self::MergeFailed => f.write_str("Failed to merge. Please try again."),
            Self::Cancelled => f.write_str("Merge cancelled."),
            Self::Busy => f.write_str("Please wait for the current operation to finish."),
        }
    }
}

impl From<&OnePdfError> for UserNotice {
    fn from(err: &OnePdfError) -> Self {
        match err {
            OnePdfError::InsufficientSelection { required, .. } => Self::SelectAtLeast {
                required: *required,
            },
            OnePdfError::Cancelled => Self::Cancelled,
            OnePdfError::DragInProgress | OnePdfError::MergeInFlight => Self::Busy,
            _ => Self::MergeFailed,
        }
    }
}

/// A successful merge-and-deliver round trip.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Statistics of the merge.
    pub statistics: MergeStatistics,
    /// Where the artifact went.
    pub delivery: DeliveryReport,
}

/// Reopens the merge gate when dropped.
#[derive(Debug)]
struct MergeGuard(Arc<AtomicBool>);

impl MergeGuard {
    fn acquire(gate: &Arc<AtomicBool>) -> Option<Self> {
        gate.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(gate)))
    }
}

impl Drop for MergeGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One admitted merge over a snapshot of the registry.
///
/// The session refuses mutations until the job finishes or is dropped.
#[derive(Debug)]
#[must_use = "the merge gate stays closed until the job is run or dropped"]
pub struct MergeJob {
    entries: Vec<FileEntry>,
    merger: Merger,
    cancel: CancellationToken,
    _guard: MergeGuard,
}

impl MergeJob {
    /// Entries being merged, in order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Token that cancels this job.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the merge to completion.
    pub async fn run(self) -> Result<MergeResult> {
        self.merger.merge(&self.entries, &self.cancel).await
    }
}

/// Explicitly owned state of one merge session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    registry: Registry,
    controller: ReorderController,
    ingestor: Ingestor,
    merger: Merger,
    merge_gate: Arc<AtomicBool>,
}

impl Session {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ingestor: Ingestor::new(config.accepted_type.clone()),
            merger: Merger::new(config.compression),
            config,
            registry: Registry::new(),
            controller: ReorderController::new(),
            merge_gate: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view of the current order.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether a drag gesture is active.
    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Whether a merge job is alive.
    pub fn is_merging(&self) -> bool {
        self.merge_gate.load(Ordering::Acquire)
    }

    /// Admit a batch of host file handles.
    ///
    /// # Errors
    ///
    /// Returns [`OnePdfError::MergeInFlight`] while a merge is running.
    pub fn ingest<I>(&mut self, source: IngestSource, handles: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = Arc<dyn FileHandle>>,
    {
        if self.is_merging() {
            return Err(OnePdfError::MergeInFlight);
        }
        Ok(self.ingestor.ingest(&mut self.registry, source, handles))
    }

    /// Remove the entry with `id`. Returns whether anything was removed;
    /// removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a busy error while a drag gesture or a merge is active.
    pub fn remove(&mut self, id: EntryId) -> Result<bool> {
        self.ensure_mutable()?;

        let removed = self.registry.remove(id);
        if let Some(entry) = &removed {
            debug!(%id, name = entry.original_name(), "Removed entry");
        }
        Ok(removed.is_some())
    }

    /// Feed a drag gesture event. Gestures are ignored while merging.
    pub fn drag(&mut self, event: DragEvent) -> ReorderOutcome {
        if self.is_merging() {
            debug!(?event, "Ignoring drag event during merge");
            return ReorderOutcome::Ignored;
        }
        self.controller.handle(&mut self.registry, event)
    }

    /// Admit a merge of the current order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A merge is already running
    /// - A drag gesture is active
    /// - Fewer than `min_selection` entries are present
    pub fn begin_merge(&self) -> Result<MergeJob> {
        if self.is_dragging() {
            return Err(OnePdfError::DragInProgress);
        }

        let actual = self.registry.len();
        if actual < self.config.min_selection {
            return Err(OnePdfError::InsufficientSelection {
                required: self.config.min_selection,
                actual,
            });
        }

        let guard = MergeGuard::acquire(&self.merge_gate).ok_or(OnePdfError::MergeInFlight)?;

        Ok(MergeJob {
            entries: self.registry.snapshot(),
            merger: self.merger.clone(),
            cancel: CancellationToken::new(),
            _guard: guard,
        })
    }

    /// Merge the current order and return the artifact.
    pub async fn merge(&self) -> Result<MergeResult> {
        self.begin_merge()?.run().await
    }

    /// Merge the current order and hand the artifact to `delivery`.
    ///
    /// Every failure collapses into one [`UserNotice`]; the detailed error
    /// is logged. The registry is never modified.
    pub async fn merge_and_deliver(
        &self,
        delivery: &Delivery,
    ) -> std::result::Result<MergeOutcome, UserNotice> {
        let result = self.merge().await.map_err(|e| notice_for(&e))?;
        let report = delivery
            .deliver(&result)
            .await
            .map_err(|e| notice_for(&e))?;

        Ok(MergeOutcome {
            statistics: result.statistics().clone(),
            delivery: report,
        })
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_merging() {
            return Err(OnePdfError::MergeInFlight);
        }
        if self.is_dragging() {
            return Err(OnePdfError::DragInProgress);
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            ingestor: Ingestor::new(crate::config::PDF_MIME_TYPE),
            merger: Merger::default(),
            config: SessionConfig::default(),
            registry: Registry::new(),
            controller: ReorderController::new(),
            merge_gate: Arc::new(AtomicBool::new(false)),
        }
    }
}

fn notice_for(err: &OnePdfError) -> UserNotice {
    let notice = UserNotice::from(err);
    match notice {
        UserNotice::MergeFailed => warn!(error = %err, "Merge failed"),
        _ => info!(error = %err, "Merge not performed"),
    }
    notice
}
