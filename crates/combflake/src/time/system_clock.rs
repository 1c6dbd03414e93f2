use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The process wall clock.
///
/// Reads [`SystemTime::now`] on every call, so it follows NTP corrections in
/// both directions. The strict Snowflake generator turns a backwards step into
/// [`Error::ClockMovedBackwards`]; the tolerant one absorbs it.
///
/// A system clock set before 1970 reads as `0`.
///
/// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        let now = SystemClock.current_millis();
        assert!(now > crate::SEATA_EPOCH.as_millis() as u64);
    }

    #[test]
    fn system_clock_does_not_jump_far() {
        let a = SystemClock.current_millis();
        let b = SystemClock.current_millis();
        assert!(b.abs_diff(a) < 1_000);
    }
}
