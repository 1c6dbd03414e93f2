use core::time::Duration;

use crate::{Error, Result, SEATA_EPOCH, SeataLayout, TWITTER_EPOCH, TwitterLayout};

/// Default number of clock reads the strict generator makes while waiting for
/// the next millisecond before giving up with [`Error::ClockStalled`].
pub const DEFAULT_MAX_SPINS: u64 = 10_000_000;

/// Default pause taken by the tolerant generator when its counter has caught
/// up with the clock.
pub const DEFAULT_SEATA_WAIT: Duration = Duration::from_millis(5);

/// Configuration of a [`TwitterGenerator`].
///
/// [`TwitterGenerator`]: crate::TwitterGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TwitterConfig {
    /// Worker id, unique within the datacenter.
    pub worker_id: u64,
    /// Datacenter id.
    pub datacenter_id: u64,
    /// Zero point of the timestamp field, as a duration since the UNIX epoch.
    pub epoch: Duration,
    /// Field widths.
    pub layout: TwitterLayout,
    /// Clock reads allowed while waiting out an exhausted sequence.
    pub max_spins: u64,
    /// When above one, each new millisecond starts its sequence at a random
    /// value below this bound instead of zero.
    pub random_sequence_start: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl TwitterConfig {
    /// Classic layout, Twitter epoch, default spin budget.
    pub const fn new(worker_id: u64, datacenter_id: u64) -> Self {
        Self {
            worker_id,
            datacenter_id,
            epoch: TWITTER_EPOCH,
            layout: TwitterLayout::CLASSIC,
            max_spins: DEFAULT_MAX_SPINS,
            random_sequence_start: 0,
        }
    }

    #[must_use]
    pub const fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: TwitterLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_max_spins(mut self, max_spins: u64) -> Self {
        self.max_spins = max_spins;
        self
    }

    #[must_use]
    pub const fn with_random_sequence_start(mut self, bound: u64) -> Self {
        self.random_sequence_start = bound;
        self
    }

    /// Checks the layout and that both ids fit their fields.
    ///
    /// # Errors
    /// [`Error::InvalidLayout`], [`Error::WorkerIdOutOfRange`] or
    /// [`Error::DatacenterIdOutOfRange`].
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.worker_id > self.layout.max_worker_id() {
            return Err(Error::WorkerIdOutOfRange {
                worker_id: self.worker_id,
                max: self.layout.max_worker_id(),
            });
        }
        if self.datacenter_id > self.layout.max_datacenter_id() {
            return Err(Error::DatacenterIdOutOfRange {
                datacenter_id: self.datacenter_id,
                max: self.layout.max_datacenter_id(),
            });
        }
        Ok(())
    }
}

/// Configuration of a [`SeataGenerator`].
///
/// [`SeataGenerator`]: crate::SeataGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeataConfig {
    /// Worker id.
    pub worker_id: u64,
    /// Zero point of the timestamp field, as a duration since the UNIX epoch.
    pub epoch: Duration,
    /// Field widths.
    pub layout: SeataLayout,
    /// Pause taken when the counter has caught up with the clock.
    pub wait: Duration,
    /// How many pauses one call may take before issuing anyway.
    pub max_waits: u32,
}

impl Default for SeataConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SeataConfig {
    /// Classic layout, Seata epoch, one 5 ms wait.
    pub const fn new(worker_id: u64) -> Self {
        Self {
            worker_id,
            epoch: SEATA_EPOCH,
            layout: SeataLayout::CLASSIC,
            wait: DEFAULT_SEATA_WAIT,
            max_waits: 1,
        }
    }

    #[must_use]
    pub const fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: SeataLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_wait(mut self, wait: Duration, max_waits: u32) -> Self {
        self.wait = wait;
        self.max_waits = max_waits;
        self
    }

    /// Checks the layout and that the worker id fits its field.
    ///
    /// # Errors
    /// [`Error::InvalidLayout`] or [`Error::WorkerIdOutOfRange`].
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.worker_id > self.layout.max_worker_id() {
            return Err(Error::WorkerIdOutOfRange {
                worker_id: self.worker_id,
                max: self.layout.max_worker_id(),
            });
        }
        Ok(())
    }
}

/// Selects one of the two 64-bit strategies, with its settings.
///
/// Persisted configurations name the strategy explicitly:
///
/// ```json
/// { "strategy": "twitter", "worker_id": 1, "datacenter_id": 2 }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "strategy", rename_all = "snake_case")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorConfig {
    /// Strict generation: fails on clock rollback.
    Twitter(TwitterConfig),
    /// Tolerant generation: never fails.
    Seata(SeataConfig),
}

impl GeneratorConfig {
    /// # Errors
    /// Whatever the selected configuration's `validate` returns.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Twitter(config) => config.validate(),
            Self::Seata(config) => config.validate(),
        }
    }
}

impl From<TwitterConfig> for GeneratorConfig {
    fn from(config: TwitterConfig) -> Self {
        Self::Twitter(config)
    }
}

impl From<SeataConfig> for GeneratorConfig {
    fn from(config: SeataConfig) -> Self {
        Self::Seata(config)
    }
}
