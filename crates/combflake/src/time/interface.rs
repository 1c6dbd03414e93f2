use core::time::Duration;
use std::sync::Arc;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Seata epoch: Sunday, May 3, 2020 00:00:00 UTC
pub const SEATA_EPOCH: Duration = Duration::from_millis(1_588_435_200_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock, a
/// [`NoRepeatClock`], or a mocked time source in tests.
///
/// The unit is **milliseconds since the UNIX epoch**. Generators subtract
/// their own configured epoch before encoding.
///
/// # Example
///
/// ```
/// use combflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`NoRepeatClock`]: crate::NoRepeatClock
pub trait TimeSource {
    /// Returns the current time in milliseconds since the UNIX epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
