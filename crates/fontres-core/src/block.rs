// this_file: crates/fontres-core/src/block.rs

//! Input blocking around backend calls
//!
//! While a driver has backend or display state half-updated, externally
//! triggered callbacks (input handlers, signal-like events) must wait.
//! [`InputBlocker::block`] returns a guard; callbacks handed to
//! [`InputBlocker::defer`] while a guard is alive run when it drops, on
//! every exit path.
//!
//! The block does not nest. Acquiring it again while held yields an inert
//! guard that leaves the outer block in place.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

type Pending = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub struct InputBlocker {
    blocked: AtomicBool,
    pending: Mutex<Vec<Pending>>,
}

impl InputBlocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self) -> BlockInput<'_> {
        let owner = !self.blocked.swap(true, Ordering::AcqRel);
        if !owner {
            log::warn!("input already blocked; nested block is a no-op");
        }
        BlockInput {
            blocker: self,
            owner,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Runs `callback` now, or when the current block ends
    pub fn defer(&self, callback: impl FnOnce() + Send + 'static) {
        if self.is_blocked() {
            self.pending.lock().push(Box::new(callback));
        } else {
            callback();
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    fn unblock(&self) {
        self.blocked.store(false, Ordering::Release);
        let pending = std::mem::take(&mut *self.pending.lock());
        if !pending.is_empty() {
            log::debug!("delivering {} deferred callbacks", pending.len());
        }
        for callback in pending {
            callback();
        }
    }
}

impl std::fmt::Debug for InputBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBlocker")
            .field("blocked", &self.is_blocked())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Scope guard returned by [`InputBlocker::block`]
#[must_use = "input is unblocked as soon as the guard is dropped"]
pub struct BlockInput<'a> {
    blocker: &'a InputBlocker,
    owner: bool,
}

impl BlockInput<'_> {
    /// Whether this guard holds the block (the outermost one)
    pub fn is_owner(&self) -> bool {
        self.owner
    }
}

impl Drop for BlockInput<'_> {
    fn drop(&mut self) {
        if self.owner {
            self.blocker.unblock();
        }
    }
}
