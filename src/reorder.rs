//! Drag-gesture state machine over the registry order.
//!
//! The controller only sees three high-level events from the gesture
//! recognizer: a drag starting on an entry, a drag ending (optionally over
//! another entry), and a cancellation. A completed drop over a different,
//! still-present entry relocates the dragged entry to the target's position;
//! everything else leaves the registry untouched.
//!
//! ```text
//! Idle --start(id)--> Dragging { active }
//! Dragging --end(active, over)--> Idle   (move, or no-op)
//! Dragging --cancel--> Idle
//! ```

use tracing::{debug, warn};

use crate::registry::{EntryId, Registry};

/// Gesture lifecycle events delivered by the drag recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// A drag began on an entry.
    Start(EntryId),
    /// The drag was released, over an entry or over nothing.
    End {
        /// Entry being dragged.
        active: EntryId,
        /// Entry under the pointer on release.
        over: Option<EntryId>,
    },
    /// The gesture was aborted (escape key, pointer lost).
    Cancel,
}

/// Current gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is dragging `active`.
    Dragging {
        /// Entry being dragged.
        active: EntryId,
    },
}

/// Why a terminal event left the order unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Dropped onto itself.
    SameTarget,
    /// Dropped outside any entry.
    NoTarget,
    /// The gesture was cancelled.
    Cancelled,
    /// The dragged or target entry is no longer in the registry, or the
    /// release names a different entry than the one being dragged.
    Stale,
}

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// A gesture began.
    Started,
    /// The entry at `from` now sits at `to`.
    Moved {
        /// Previous position of the dragged entry.
        from: usize,
        /// New position of the dragged entry.
        to: usize,
    },
    /// The gesture ended without changing the order.
    Unchanged(NoOpReason),
    /// The event did not fit the current state and was dropped.
    Ignored,
}

/// Drag-and-drop reorder controller.
#[derive(Debug, Default)]
pub struct ReorderController {
    state: DragState,
}

impl ReorderController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Feed one gesture event.
    pub fn handle(&mut self, registry: &mut Registry, event: DragEvent) -> ReorderOutcome {
        match event {
            DragEvent::Start(id) => self.start(registry, id),
            DragEvent::End { active, over } => self.end(registry, active, over),
            DragEvent::Cancel => self.cancel(),
        }
    }

    /// Begin dragging `id`.
    ///
    /// Ignored while another gesture is active or when `id` is unknown.
    pub fn start(&mut self, registry: &Registry, id: EntryId) -> ReorderOutcome {
        if let DragState::Dragging { active } = self.state {
            warn!(%active, ignored = %id, "Ignoring overlapping drag start");
            return ReorderOutcome::Ignored;
        }
        if !registry.contains(id) {
            debug!(%id, "Ignoring drag start on unknown entry");
            return ReorderOutcome::Ignored;
        }

        self.state = DragState::Dragging { active: id };
        ReorderOutcome::Started
    }

    /// Release the gesture, relocating `active` to the position of `over`.
    pub fn end(
        &mut self,
        registry: &mut Registry,
        active: EntryId,
        over: Option<EntryId>,
    ) -> ReorderOutcome {
        let dragging = match std::mem::take(&mut self.state) {
            DragState::Idle => return ReorderOutcome::Ignored,
            DragState::Dragging { active } => active,
        };

        if dragging != active {
            return ReorderOutcome::Unchanged(NoOpReason::Stale);
        }
        let Some(over) = over else {
            return ReorderOutcome::Unchanged(NoOpReason::NoTarget);
        };
        if active == over {
            return ReorderOutcome::Unchanged(NoOpReason::SameTarget);
        }

        let (Some(from), Some(to)) = (registry.position(active), registry.position(over)) else {
            debug!(%active, %over, "Ignoring drop involving a removed entry");
            return ReorderOutcome::Unchanged(NoOpReason::Stale);
        };

        registry.move_entry(from, to);
        debug!(%active, from, to, "Moved entry");
        ReorderOutcome::Moved { from, to }
    }

    /// Abort the gesture without touching the order.
    pub fn cancel(&mut self) -> ReorderOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => ReorderOutcome::Ignored,
            DragState::Dragging { .. } => ReorderOutcome::Unchanged(NoOpReason::Cancelled),
        }
    }
}
