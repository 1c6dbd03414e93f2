use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Converts a [`SystemTime`] into whole milliseconds since the UNIX epoch.
///
/// Sub-millisecond precision is floored toward negative infinity, so instants
/// before 1970 land on the millisecond boundary at or before them.
///
/// # Example
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use combflake::to_unix_millis;
///
/// assert_eq!(to_unix_millis(UNIX_EPOCH + Duration::from_micros(1_500)), 1);
/// assert_eq!(to_unix_millis(UNIX_EPOCH - Duration::from_micros(1_500)), -2);
/// ```
pub fn to_unix_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let whole = i64::try_from(before.as_millis()).unwrap_or(i64::MAX);
            if before.as_nanos() % 1_000_000 == 0 {
                -whole
            } else {
                -whole - 1
            }
        }
    }
}

/// Converts milliseconds since the UNIX epoch back into a [`SystemTime`].
///
/// Values the platform cannot represent saturate to [`UNIX_EPOCH`].
pub fn from_unix_millis(millis: i64) -> SystemTime {
    let offset = Duration::from_millis(millis.unsigned_abs());
    let time = if millis >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.unwrap_or(UNIX_EPOCH)
}
