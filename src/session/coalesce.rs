//! Input coalescing: a single-slot "latest wins" mailbox and a settle timer.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Slot<T> {
    value: Option<T>,
    closed: bool,
    replaced: u64,
}

/// Single-slot mailbox between an input thread and a render thread.
///
/// Publishing overwrites any value the consumer has not taken yet, so the consumer only ever
/// sees the newest one. Clones share the same slot.
pub struct LatestWins<T> {
    inner: Arc<(Mutex<Slot<T>>, Condvar)>,
}

impl<T> Clone for LatestWins<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for LatestWins<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for LatestWins<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.lock();
        f.debug_struct("LatestWins")
            .field("pending", &slot.value.is_some())
            .field("closed", &slot.closed)
            .field("replaced", &slot.replaced)
            .finish()
    }
}

impl<T> LatestWins<T> {
    /// Create an empty, open mailbox.
    pub fn new() -> Self {
        Self {
            inner: Arc::new((
                Mutex::new(Slot {
                    value: None,
                    closed: false,
                    replaced: 0,
                }),
                Condvar::new(),
            )),
        }
    }

    // A panic while holding the lock cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value`, replacing an unconsumed one. Returns `true` if something was replaced.
    ///
    /// Values published after [`LatestWins::close`] are dropped.
    pub fn publish(&self, value: T) -> bool {
        let mut slot = self.lock();
        if slot.closed {
            return false;
        }
        let replaced = slot.value.replace(value).is_some();
        if replaced {
            slot.replaced = slot.replaced.saturating_add(1);
        }
        drop(slot);
        self.inner.1.notify_one();
        replaced
    }

    /// Take the pending value without waiting.
    pub fn try_take(&self) -> Option<T> {
        self.lock().value.take()
    }

    /// Wait for a value. Returns `None` once the mailbox is closed and drained.
    pub fn take_blocking(&self) -> Option<T> {
        let mut slot = self.lock();
        loop {
            if let Some(v) = slot.value.take() {
                return Some(v);
            }
            if slot.closed {
                return None;
            }
            slot = self
                .inner
                .1
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wait up to `timeout` for a value.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock();
        loop {
            if let Some(v) = slot.value.take() {
                return Some(v);
            }
            let now = Instant::now();
            if slot.closed || now >= deadline {
                return None;
            }
            slot = self
                .inner
                .1
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Stop accepting values and wake blocked consumers.
    pub fn close(&self) {
        self.lock().closed = true;
        self.inner.1.notify_all();
    }

    /// Number of values overwritten before being consumed.
    pub fn replaced_count(&self) -> u64 {
        self.lock().replaced
    }
}

/// Fires once after a quiet period following the last [`Debounce::arm`].
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    delay: Duration,
    armed_at: Option<Instant>,
}

impl Debounce {
    /// Create a disarmed timer.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            armed_at: None,
        }
    }

    /// Quiet period length.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start or restart the quiet period at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    /// Return `true` while waiting to fire.
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Return `true` exactly once when the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/coalesce.rs"]
mod tests;
