//! Mutual exclusion for read-modify-write sequences.

use parking_lot::{FairMutex, FairMutexGuard};

/// Lets one load-merge-save sequence run at a time.
///
/// Waiters are queued in arrival order, so under contention nobody gets
/// skipped. Plain reads don't need it: saves replace the file atomically.
#[derive(Default)]
pub struct MutationGuard {
    lock: FairMutex<()>,
}

/// Exclusive access held until dropped. Dropping also happens while
/// unwinding, so a panicking merge still releases the guard.
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct MutationScope<'a> {
    _held: FairMutexGuard<'a, ()>,
}

impl MutationGuard {
    /// New, unheld guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every earlier caller is done, then hold the guard.
    pub fn acquire(&self) -> MutationScope<'_> {
        MutationScope {
            _held: self.lock.lock(),
        }
    }

    /// Run `f` while holding the guard.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = self.acquire();
        f()
    }

    /// `true` while some caller holds the guard.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.lock.is_locked()
    }
}

impl std::fmt::Debug for MutationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationGuard")
            .field("held", &self.is_held())
            .finish()
    }
}
