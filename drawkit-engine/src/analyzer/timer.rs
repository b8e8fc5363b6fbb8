//! Clocks and the cancellable debounce timer.
//!
//! Nothing here spawns threads or registers callbacks. The host polls the
//! timer from its event loop (see
//! [`TracingDrawEngine::tick`](super::TracingDrawEngine::tick)).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> f64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `ms` milliseconds.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// `window.performance.now()`.
#[cfg(feature = "wasm")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceClock;

#[cfg(feature = "wasm")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now())
    }
}

/// The clock used when none is given.
#[must_use]
pub fn default_clock() -> Box<dyn Clock> {
    #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
    {
        Box::new(PerformanceClock)
    }
    #[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
    {
        Box::new(MonotonicClock::new())
    }
}

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Pending<T> {
    handle: TimerHandle,
    due: f64,
    payload: T,
}

/// A single delayed payload. Scheduling again replaces the pending one.
pub struct Debouncer<T> {
    pending: Option<Pending<T>>,
    next_id: u64,
}

impl<T> Debouncer<T> {
    /// Create a timer with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: None,
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire `delay` ms after `now`, cancelling any
    /// pending payload.
    pub fn schedule(&mut self, now: f64, delay: f64, payload: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        if self.pending.is_some() {
            tracing::trace!("Rescheduling debounced timer");
        }
        self.pending = Some(Pending {
            handle,
            due: now + delay,
            payload,
        });
        handle
    }

    /// Cancel whatever is pending. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel the timer identified by `handle` if it is still pending.
    pub fn cancel_handle(&mut self, handle: TimerHandle) -> bool {
        if self.is_current(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether `handle` is the pending timer.
    #[must_use]
    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.pending.as_ref().is_some_and(|p| p.handle == handle)
    }

    /// Whether a payload is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds until the pending payload is due.
    #[must_use]
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.pending.as_ref().map(|p| (p.due - now).max(0.0))
    }

    /// Take the payload if it is due at `now`.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.pending.take().map(|p| p.payload)
        } else {
            None
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.pending.as_ref().map(|p| (p.handle, p.due)))
            .finish()
    }
}
