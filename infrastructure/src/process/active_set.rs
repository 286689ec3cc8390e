//! Bounded set of in-flight executions used for admission control.

use opsroute_domain::ExecutionId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct ActiveState {
    ids: HashSet<ExecutionId>,
    /// Highest occupancy ever observed.
    peak: usize,
}

/// Process-wide set of running executions.
///
/// Invariant: `len() <= capacity()` at all times. Admission is a single
/// check-and-insert under one lock, so concurrent callers can never overshoot
/// the ceiling. Membership is held by an [`ActiveSlot`] and released when the
/// slot is dropped, which covers normal exit, errors, timeouts and panics.
#[derive(Debug)]
pub struct ActiveCommandSet {
    capacity: usize,
    state: Mutex<ActiveState>,
}

impl ActiveCommandSet {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity,
            state: Mutex::new(ActiveState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, ActiveState> {
        // Every mutation is a single insert or remove; poisoning is ignored.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim a slot, or return `None` if the set is full.
    pub fn try_acquire(self: &Arc<Self>) -> Option<ActiveSlot> {
        let mut state = self.state();
        if state.ids.len() >= self.capacity {
            return None;
        }

        let id = ExecutionId::next();
        state.ids.insert(id);
        state.peak = state.peak.max(state.ids.len());

        Some(ActiveSlot {
            id,
            set: Arc::clone(self),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ExecutionId) -> bool {
        self.state().ids.contains(&id)
    }

    /// Highest number of simultaneously active executions so far.
    pub fn peak(&self) -> usize {
        self.state().peak
    }

    fn release(&self, id: ExecutionId) {
        self.state().ids.remove(&id);
    }
}

/// Membership in an [`ActiveCommandSet`]; released on drop.
#[derive(Debug)]
pub struct ActiveSlot {
    id: ExecutionId,
    set: Arc<ActiveCommandSet>,
}

impl ActiveSlot {
    pub fn id(&self) -> ExecutionId {
        self.id
    }
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.set.release(self.id);
    }
}
