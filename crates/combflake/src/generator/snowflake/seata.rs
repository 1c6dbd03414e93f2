use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, RandSource, Result, SeataConfig, SnowflakeGenerator, SnowflakeParts, SystemClock,
    ThreadRandom, TimeSource,
};

/// A tolerant, lock-free Snowflake ID generator (Seata-style).
///
/// Timestamp and sequence live in one [`AtomicU64`] counter that is seeded
/// from the clock at construction and then only ever incremented; the worker
/// id is OR'ed in above it when an ID is read out. Because the counter cannot
/// move backwards, neither can the IDs, whatever the clock does.
///
/// The clock is only consulted to keep the counter from running ahead of real
/// time: if the counter's timestamp has caught up with the clock (a burst
/// beyond 4096 IDs per millisecond), the call sleeps for
/// [`SeataConfig::wait`], at most [`SeataConfig::max_waits`] times, and then
/// issues regardless. Uniqueness never depends on the wait.
///
/// ## Behavior
/// - ✅ Never fails after construction
/// - ✅ Strictly increasing IDs per instance, even across clock rollback
/// - ⚠️ Embedded timestamps lag or lead the wall clock; they record when the
///   counter was seeded plus how many IDs were issued since
///
/// ## See Also
/// - [`TwitterGenerator`]
///
/// [`TwitterGenerator`]: crate::TwitterGenerator
#[derive(Debug)]
pub struct SeataGenerator<T = SystemClock> {
    #[cfg(feature = "cache-padded")]
    counter: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    counter: AtomicU64,
    config: SeataConfig,
    epoch_millis: u64,
    clock: T,
}

impl SeataGenerator<SystemClock> {
    /// Creates a generator on the system clock with the classic layout and the
    /// Seata epoch.
    ///
    /// # Errors
    /// [`Error::WorkerIdOutOfRange`] when `worker_id` exceeds 1023.
    ///
    /// # Example
    /// ```
    /// use combflake::{SeataGenerator, SnowflakeGenerator};
    ///
    /// let generator = SeataGenerator::new(7).unwrap();
    /// let ids = generator.next_ids(3);
    /// assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    /// assert_eq!(generator.decompose(ids[0]).worker_id, 7);
    /// ```
    pub fn new(worker_id: u64) -> Result<Self> {
        Self::with_config(SeataConfig::new(worker_id), SystemClock)
    }

    /// Creates a generator with a worker id drawn at random, for deployments
    /// that have no worker id to assign.
    ///
    /// Two such generators collide with probability `1/1024`; assign ids
    /// explicitly whenever possible.
    ///
    /// # Errors
    /// Never in practice; the drawn id always fits.
    pub fn with_random_worker() -> Result<Self> {
        let config = SeataConfig::default();
        let worker_id = RandSource::<u64>::rand(&ThreadRandom) & config.layout.max_worker_id();
        Self::with_config(SeataConfig { worker_id, ..config }, SystemClock)
    }
}

impl<T: TimeSource> SeataGenerator<T> {
    /// Creates a generator from an explicit configuration and clock, seeding
    /// the counter from the clock's current reading.
    ///
    /// # Errors
    /// Any error from [`SeataConfig::validate`], or [`Error::EpochInFuture`]
    /// if the clock reads before the configured epoch.
    pub fn with_config(config: SeataConfig, clock: T) -> Result<Self> {
        config.validate()?;
        let epoch_millis = config.epoch.as_millis() as u64;
        let now = clock.current_millis();
        if now < epoch_millis {
            return Err(Error::EpochInFuture {
                epoch: epoch_millis,
                now,
            });
        }
        let seed = ((now - epoch_millis) & config.layout.max_timestamp())
            << config.layout.sequence_bits;
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            counter: crossbeam_utils::CachePadded::new(AtomicU64::new(seed)),
            #[cfg(not(feature = "cache-padded"))]
            counter: AtomicU64::new(seed),
            config,
            epoch_millis,
            clock,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SeataConfig {
        &self.config
    }

    /// Generates the next ID. Never fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> i64 {
        self.wait_if_necessary();
        let next = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.config.layout.from_counter(self.config.worker_id, next)
    }

    /// Generates `count` IDs by calling [`Self::next_id`] `count` times.
    pub fn next_ids(&self, count: usize) -> Vec<i64> {
        (0..count).map(|_| self.next_id()).collect()
    }

    fn wait_if_necessary(&self) {
        let layout = &self.config.layout;
        for _ in 0..self.config.max_waits {
            let current = (self.counter.load(Ordering::Relaxed) >> layout.sequence_bits)
                & layout.max_timestamp();
            let newest = self
                .clock
                .current_millis()
                .saturating_sub(self.epoch_millis);
            if current < newest {
                return;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(current, newest, "counter caught up with clock, waiting");
            if !self.config.wait.is_zero() {
                std::thread::sleep(self.config.wait);
            }
        }
    }
}

impl<T: TimeSource> SnowflakeGenerator for SeataGenerator<T> {
    fn try_next_id(&self) -> Result<i64> {
        Ok(self.next_id())
    }

    fn try_next_ids(&self, count: usize) -> Result<Vec<i64>> {
        Ok(self.next_ids(count))
    }

    fn decompose(&self, id: i64) -> SnowflakeParts {
        self.config.layout.decompose(id)
    }

    fn epoch(&self) -> Duration {
        self.config.epoch
    }
}
