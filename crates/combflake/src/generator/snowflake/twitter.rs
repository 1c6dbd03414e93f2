use core::{cmp::Ordering, time::Duration};

use rand::{Rng, rng};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result, SnowflakeGenerator, SnowflakeParts, SystemClock, TimeSource, TwitterConfig,
    mutex::{Mutex, lock},
};

/// Yield the thread every this many spins while waiting for the next tick.
const SPINS_PER_YIELD: u64 = 1024;

#[derive(Debug)]
struct TwitterState {
    /// Wall-clock millis of the last issued ID.
    last_timestamp: u64,
    sequence: u64,
}

/// A strict, lock-based Snowflake ID generator (Twitter-style).
///
/// Every call reads the clock and updates `(last_timestamp, sequence)` under a
/// single mutex, so calls on one instance are fully serialized. Share one
/// instance (by reference or [`Arc`]) among all threads acting as the same
/// worker.
///
/// ## Behavior
/// - ✅ Strictly increasing IDs for a non-regressing clock
/// - ✅ Clock rollback is reported as [`Error::ClockMovedBackwards`], never
///   papered over
/// - ⚠️ When the sequence is exhausted the call spins, holding the lock,
///   until the clock ticks over; a clock that never ticks yields
///   [`Error::ClockStalled`] after [`TwitterConfig::max_spins`] reads
///
/// ## See Also
/// - [`SeataGenerator`]
///
/// [`Arc`]: std::sync::Arc
/// [`SeataGenerator`]: crate::SeataGenerator
#[derive(Debug)]
pub struct TwitterGenerator<T = SystemClock> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<TwitterState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<TwitterState>,
    config: TwitterConfig,
    epoch_millis: u64,
    clock: T,
}

impl TwitterGenerator<SystemClock> {
    /// Creates a generator on the system clock with the classic layout and
    /// the Twitter epoch.
    ///
    /// # Errors
    /// [`Error::WorkerIdOutOfRange`] or [`Error::DatacenterIdOutOfRange`] when
    /// an id exceeds 31.
    ///
    /// # Example
    /// ```
    /// use combflake::{SnowflakeGenerator, TwitterGenerator};
    ///
    /// let generator = TwitterGenerator::new(1, 1).unwrap();
    /// let a = generator.try_next_id().unwrap();
    /// let b = generator.try_next_id().unwrap();
    /// assert!(b > a);
    ///
    /// let parts = generator.decompose(a);
    /// assert_eq!(parts.worker_id, 1);
    /// assert_eq!(parts.datacenter_id, 1);
    ///
    /// assert!(TwitterGenerator::new(32, 0).is_err());
    /// ```
    pub fn new(worker_id: u64, datacenter_id: u64) -> Result<Self> {
        Self::with_config(TwitterConfig::new(worker_id, datacenter_id), SystemClock)
    }
}

impl<T: TimeSource> TwitterGenerator<T> {
    /// Creates a generator from an explicit configuration and clock.
    ///
    /// # Errors
    /// Any error from [`TwitterConfig::validate`].
    pub fn with_config(config: TwitterConfig, clock: T) -> Result<Self> {
        config.validate()?;
        let state = Mutex::new(TwitterState {
            last_timestamp: 0,
            sequence: 0,
        });
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            epoch_millis: config.epoch.as_millis() as u64,
            config,
            clock,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    /// Generates the next ID.
    ///
    /// # Errors
    /// - [`Error::ClockMovedBackwards`] if the clock reads earlier than the
    ///   last issued timestamp. No ID is produced and state is unchanged.
    /// - [`Error::ClockStalled`] if the sequence is exhausted and the clock
    ///   does not advance within the spin budget. State is unchanged.
    /// - [`Error::EpochInFuture`] if the clock reads before the configured
    ///   epoch.
    /// - [`Error::TimestampOverflow`] if the time since the epoch no longer
    ///   fits the layout's timestamp field.
    /// - [`Error::LockPoisoned`] if another thread panicked holding the lock.
    ///
    /// State is only updated when an ID is returned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<i64> {
        let mut state = lock(&self.state)?;
        // Read under the lock so a newer reading from another thread can
        // never look like a rollback.
        let now = self.clock.current_millis();

        let (now, sequence) = match now.cmp(&state.last_timestamp) {
            Ordering::Less => return Err(Self::cold_clock_behind(state.last_timestamp, now)),
            Ordering::Equal => {
                let next = (state.sequence + 1) & self.config.layout.max_sequence();
                if next == 0 {
                    let now = self.wait_next_millis(state.last_timestamp)?;
                    (now, self.start_sequence())
                } else {
                    (now, next)
                }
            }
            Ordering::Greater => (now, self.start_sequence()),
        };

        let id = self.compose(now, sequence)?;
        state.last_timestamp = now;
        state.sequence = sequence;
        Ok(id)
    }

    /// Generates `count` IDs, see [`SnowflakeGenerator::try_next_ids`].
    ///
    /// # Errors
    /// The first error from [`Self::try_next_id`].
    pub fn try_next_ids(&self, count: usize) -> Result<Vec<i64>> {
        SnowflakeGenerator::try_next_ids(self, count)
    }

    /// Packs `now` and `sequence`, refusing timestamps the layout cannot hold
    /// in order.
    fn compose(&self, now: u64, sequence: u64) -> Result<i64> {
        let Some(timestamp) = now.checked_sub(self.epoch_millis) else {
            return Err(Self::cold_before_epoch(self.epoch_millis, now));
        };
        let max = self.config.layout.max_timestamp();
        if timestamp > max {
            return Err(Self::cold_timestamp_overflow(timestamp, max));
        }
        Ok(self.config.layout.compose(&SnowflakeParts {
            timestamp,
            datacenter_id: self.config.datacenter_id,
            worker_id: self.config.worker_id,
            sequence,
        }))
    }

    fn start_sequence(&self) -> u64 {
        let bound = self
            .config
            .random_sequence_start
            .min(self.config.layout.max_sequence() + 1);
        if bound > 1 {
            rng().random_range(0..bound)
        } else {
            0
        }
    }

    /// Spins until the clock reads past `last`.
    fn wait_next_millis(&self, last: u64) -> Result<u64> {
        for spins in 1..=self.config.max_spins {
            let now = self.clock.current_millis();
            if now > last {
                return Ok(now);
            }
            if spins % SPINS_PER_YIELD == 0 {
                std::thread::yield_now();
            } else {
                core::hint::spin_loop();
            }
        }
        Err(Self::cold_clock_stalled(last, self.config.max_spins))
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, behind_ms = last - now, "clock moved backwards");
        Error::ClockMovedBackwards { last, now }
    }

    #[cold]
    #[inline(never)]
    fn cold_before_epoch(epoch: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(epoch, now, "clock reads before the configured epoch");
        Error::EpochInFuture { epoch, now }
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64, max: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(timestamp, max, "timestamp field exhausted");
        Error::TimestampOverflow { timestamp, max }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_stalled(last: u64, spins: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, spins, "clock did not advance past exhausted sequence");
        Error::ClockStalled { last, spins }
    }
}

impl<T: TimeSource> SnowflakeGenerator for TwitterGenerator<T> {
    fn try_next_id(&self) -> Result<i64> {
        self.try_next_id()
    }

    fn decompose(&self, id: i64) -> SnowflakeParts {
        self.config.layout.decompose(id)
    }

    fn epoch(&self) -> Duration {
        self.config.epoch
    }
}
