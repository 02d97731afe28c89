//! The ordered collection of user-selected documents.
//!
//! Entries are keyed by an opaque [`EntryId`] minted at ingestion, never by
//! position: reordering and removal shift positions, identities stay put.

use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OnePdfError, Result};
use crate::io::FileHandle;

/// Opaque, never-reused identity of a [`FileEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Mint a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One user-added document: identity, payload handle and display name.
///
/// Entries are immutable. Cloning shares the payload handle.
#[derive(Debug, Clone)]
pub struct FileEntry {
    id: EntryId,
    payload: Arc<dyn FileHandle>,
    original_name: String,
}

impl FileEntry {
    /// Wrap a handle under a freshly minted id.
    pub fn new(payload: Arc<dyn FileHandle>) -> Self {
        let original_name = payload.name().to_string();
        Self {
            id: EntryId::generate(),
            payload,
            original_name,
        }
    }

    /// Identity of this entry.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Name of the file as the user selected it.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// The host file handle backing this entry.
    pub fn payload(&self) -> &Arc<dyn FileHandle> {
        &self.payload
    }

    /// Read the payload fully into memory.
    pub async fn read_bytes(&self) -> Result<Bytes> {
        self.payload
            .read_all()
            .await
            .map_err(|source| OnePdfError::ReadFailed {
                name: self.original_name.clone(),
                source,
            })
    }
}

/// Ordered, id-keyed collection of [`FileEntry`] values.
///
/// Lookup by id is O(1); order is arrival order unless changed by
/// [`Registry::move_entry`].
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<EntryId, FileEntry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with this id is present.
    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.get(&id)
    }

    /// Current position of an entry.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.get_index_of(&id)
    }

    /// Entry at a position.
    pub fn get_index(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get_index(index).map(|(_, entry)| entry)
    }

    /// Ids in current order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.keys().copied().collect()
    }

    /// Iterate over entries in current order.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    /// Append an entry at the end.
    ///
    /// Returns `false`, leaving the registry unchanged, if the id is already
    /// present.
    pub fn append(&mut self, entry: FileEntry) -> bool {
        if self.entries.contains_key(&entry.id) {
            return false;
        }
        self.entries.insert(entry.id, entry);
        true
    }

    /// Remove an entry, preserving the order of the rest.
    ///
    /// Removing an absent id is a no-op and returns `None`.
    pub fn remove(&mut self, id: EntryId) -> Option<FileEntry> {
        self.entries.shift_remove(&id)
    }

    /// Move the entry at `from` to `to`, shifting the entries in between by
    /// one position.
    ///
    /// Returns `false` if either index is out of bounds.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            self.entries.move_index(from, to);
        }
        true
    }

    /// Copy of the current entries, in order, for a merge to read.
    pub fn snapshot(&self) -> Vec<FileEntry> {
        self.entries.values().cloned().collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
