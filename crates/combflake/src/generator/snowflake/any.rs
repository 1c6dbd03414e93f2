use core::time::Duration;

use crate::{
    GeneratorConfig, Result, SeataGenerator, SnowflakeGenerator, SnowflakeParts, SystemClock,
    TimeSource, TwitterGenerator,
};

/// Either 64-bit strategy, chosen once at construction.
///
/// Lets the choice between strict and tolerant generation live in
/// configuration rather than in every call site.
///
/// # Example
/// ```
/// use combflake::{AnySnowflakeGenerator, GeneratorConfig, SeataConfig, SnowflakeGenerator};
///
/// let generator = AnySnowflakeGenerator::from_config(SeataConfig::new(3).into()).unwrap();
/// let id = generator.try_next_id().unwrap();
/// assert_eq!(generator.decompose(id).worker_id, 3);
/// ```
#[derive(Debug)]
pub enum AnySnowflakeGenerator<T = SystemClock> {
    Twitter(TwitterGenerator<T>),
    Seata(SeataGenerator<T>),
}

impl AnySnowflakeGenerator<SystemClock> {
    /// Builds the configured strategy on the system clock.
    ///
    /// # Errors
    /// Any construction error of the selected strategy.
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<T: TimeSource> AnySnowflakeGenerator<T> {
    /// Builds the configured strategy on `clock`.
    ///
    /// # Errors
    /// Any construction error of the selected strategy.
    pub fn with_clock(config: GeneratorConfig, clock: T) -> Result<Self> {
        Ok(match config {
            GeneratorConfig::Twitter(config) => {
                Self::Twitter(TwitterGenerator::with_config(config, clock)?)
            }
            GeneratorConfig::Seata(config) => {
                Self::Seata(SeataGenerator::with_config(config, clock)?)
            }
        })
    }

    /// Returns `true` for the strict strategy.
    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Twitter(_))
    }
}

impl<T: TimeSource> SnowflakeGenerator for AnySnowflakeGenerator<T> {
    fn try_next_id(&self) -> Result<i64> {
        match self {
            Self::Twitter(generator) => generator.try_next_id(),
            Self::Seata(generator) => Ok(generator.next_id()),
        }
    }

    fn try_next_ids(&self, count: usize) -> Result<Vec<i64>> {
        match self {
            Self::Twitter(generator) => generator.try_next_ids(count),
            Self::Seata(generator) => Ok(generator.next_ids(count)),
        }
    }

    fn decompose(&self, id: i64) -> SnowflakeParts {
        match self {
            Self::Twitter(generator) => generator.decompose(id),
            Self::Seata(generator) => generator.decompose(id),
        }
    }

    fn epoch(&self) -> Duration {
        match self {
            Self::Twitter(generator) => generator.epoch(),
            Self::Seata(generator) => generator.epoch(),
        }
    }
}

impl<T> From<TwitterGenerator<T>> for AnySnowflakeGenerator<T> {
    fn from(generator: TwitterGenerator<T>) -> Self {
        Self::Twitter(generator)
    }
}

impl<T> From<SeataGenerator<T>> for AnySnowflakeGenerator<T> {
    fn from(generator: SeataGenerator<T>) -> Self {
        Self::Seata(generator)
    }
}
