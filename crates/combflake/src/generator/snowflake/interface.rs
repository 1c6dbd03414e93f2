use core::time::Duration;

use crate::{Result, SnowflakeParts};

/// A minimal interface for generating 64-bit Snowflake IDs.
///
/// Both strategies, [`TwitterGenerator`] (strict) and [`SeataGenerator`]
/// (tolerant), implement it, as does the [`AnySnowflakeGenerator`] wrapper
/// that picks one at construction time.
///
/// [`TwitterGenerator`]: crate::TwitterGenerator
/// [`SeataGenerator`]: crate::SeataGenerator
/// [`AnySnowflakeGenerator`]: crate::AnySnowflakeGenerator
pub trait SnowflakeGenerator {
    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// Strict generators fail when the clock moves backwards, when the clock
    /// stalls past the spin budget, or when their lock is poisoned. Tolerant
    /// generators never fail.
    fn try_next_id(&self) -> Result<i64>;

    /// Generates `count` IDs by calling [`Self::try_next_id`] `count` times.
    ///
    /// The batch is not atomic: concurrent callers may interleave their IDs
    /// with this batch. Stops at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Self::try_next_id`].
    fn try_next_ids(&self, count: usize) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.try_next_id()?);
        }
        Ok(ids)
    }

    /// Splits an ID produced by this generator into its fields.
    fn decompose(&self, id: i64) -> SnowflakeParts;

    /// The zero point of the timestamp field.
    fn epoch(&self) -> Duration;
}
