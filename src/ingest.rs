//! Admission of host file handles into the registry.
//!
//! Both host surfaces (explicit selection and drag-and-drop) funnel through
//! [`Ingestor::ingest`]. Handles whose declared type is not the accepted
//! type are dropped without error; a mixed batch is admitted partially.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::io::FileHandle;
use crate::registry::{EntryId, FileEntry, Registry};

/// Which host surface produced a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestSource {
    /// The file-selection dialog.
    Picker,
    /// A drop onto the drop zone.
    Drop,
}

impl fmt::Display for IngestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Picker => f.write_str("picker"),
            Self::Drop => f.write_str("drop"),
        }
    }
}

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Surface the batch came from.
    pub source: IngestSource,
    /// Ids minted for admitted handles, in presentation order.
    pub admitted: Vec<EntryId>,
    /// Number of handles dropped by the type filter.
    pub rejected: usize,
}

impl IngestReport {
    /// Whether the batch left the registry unchanged.
    pub fn is_empty(&self) -> bool {
        self.admitted.is_empty()
    }
}

/// Type-filtering admission of file handles.
#[derive(Debug, Clone)]
pub struct Ingestor {
    accepted_type: String,
}

impl Ingestor {
    /// Create an ingestor admitting handles declared as `accepted_type`.
    pub fn new(accepted_type: impl Into<String>) -> Self {
        Self {
            accepted_type: accepted_type.into(),
        }
    }

    /// Whether a handle's declared type matches the accepted type.
    ///
    /// Compares the MIME essence case-insensitively; parameters after `;`
    /// are ignored.
    pub fn accepts(&self, handle: &dyn FileHandle) -> bool {
        let essence = handle
            .declared_type()
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        essence.eq_ignore_ascii_case(&self.accepted_type)
    }

    /// Admit the accepted handles of a batch into `registry`.
    ///
    /// Each admitted handle becomes a new [`FileEntry`] with a fresh id and
    /// is appended in the order presented. Performs no I/O.
    pub fn ingest<I>(&self, registry: &mut Registry, source: IngestSource, handles: I) -> IngestReport
    where
        I: IntoIterator<Item = Arc<dyn FileHandle>>,
    {
        let mut admitted = Vec::new();
        let mut rejected = 0;

        for handle in handles {
            if !self.accepts(handle.as_ref()) {
                debug!(
                    name = handle.name(),
                    declared_type = handle.declared_type(),
                    "Skipping file with unaccepted type"
                );
                rejected += 1;
                continue;
            }

            let entry = FileEntry::new(handle);
            let id = entry.id();
            if registry.append(entry) {
                admitted.push(id);
            }
        }

        debug!(
            %source,
            admitted = admitted.len(),
            rejected,
            total = registry.len(),
            "Ingested batch"
        );

        IngestReport {
            source,
            admitted,
            rejected,
        }
    }
}
