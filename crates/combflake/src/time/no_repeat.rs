use core::time::Duration;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{SystemClock, TimeSource, mutex::Mutex};

/// Default bump applied when the wrapped clock has not moved past the last
/// value handed out.
///
/// Four milliseconds is the smallest whole step that still changes the
/// encoded value of the legacy SQL Server layout, whose time field counts in
/// 1/300 s ticks.
pub const NO_REPEAT_INCREMENT: Duration = Duration::from_millis(4);

#[derive(Debug)]
struct NoRepeatInner<T> {
    clock: T,
    last: Mutex<u64>,
    increment: u64,
}

/// A [`TimeSource`] that never returns the same value twice.
///
/// Wraps another clock and remembers the last value it handed out. If the
/// wrapped clock reads at or before that value (same tick, or a backwards
/// step), the last value is bumped by a fixed increment instead. Readings are
/// therefore strictly increasing, and may run ahead of the wrapped clock
/// under bursts.
///
/// All clones share one state: the uniqueness guarantee covers every clone
/// of a single instance, across threads, and nothing else. Construct one per
/// process (or per group of generators that must not collide) and hand clones
/// to whichever generators need it.
///
/// # Example
/// ```
/// use combflake::{NoRepeatClock, TimeSource};
///
/// struct Frozen;
/// impl TimeSource for Frozen {
///     fn current_millis(&self) -> u64 {
///         1_000
///     }
/// }
///
/// let clock = NoRepeatClock::new(Frozen);
/// let shared = clock.clone();
///
/// assert_eq!(clock.current_millis(), 1_000);
/// assert_eq!(shared.current_millis(), 1_004);
/// assert_eq!(clock.current_millis(), 1_008);
/// ```
#[derive(Debug)]
pub struct NoRepeatClock<T = SystemClock> {
    inner: Arc<NoRepeatInner<T>>,
}

// Manual impl: clones share the inner state, so `T` need not be `Clone`.
impl<T> Clone for NoRepeatClock<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for NoRepeatClock<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<T: TimeSource> NoRepeatClock<T> {
    /// Wraps `clock`, bumping repeated readings by [`NO_REPEAT_INCREMENT`].
    pub fn new(clock: T) -> Self {
        Self::with_increment(clock, NO_REPEAT_INCREMENT)
    }

    /// Wraps `clock`, bumping repeated readings by `increment`.
    ///
    /// An increment under one millisecond is raised to one millisecond.
    pub fn with_increment(clock: T, increment: Duration) -> Self {
        let increment = (increment.as_millis() as u64).max(1);
        Self {
            inner: Arc::new(NoRepeatInner {
                clock,
                last: Mutex::new(0),
                increment,
            }),
        }
    }

    /// The bump, in milliseconds, applied to repeated readings.
    pub fn increment(&self) -> u64 {
        self.inner.increment
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next_millis(&self) -> u64 {
        let now = self.inner.clock.current_millis();

        // The guarded value is a plain integer that is always written whole,
        // so a poisoned lock still holds a consistent value.
        #[cfg(feature = "parking-lot")]
        let mut last = self.inner.last.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut last = self
            .inner
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let next = if now > *last {
            now
        } else {
            last.saturating_add(self.inner.increment)
        };
        *last = next;
        next
    }
}

impl<T: TimeSource> TimeSource for NoRepeatClock<T> {
    fn current_millis(&self) -> u64 {
        self.next_millis()
    }
}
