use core::time::Duration;
use std::time::SystemTime;

use crate::from_unix_millis;

/// The fields of a decoded 64-bit Snowflake ID.
///
/// `timestamp` is relative to the epoch of the generator that produced the
/// ID. Layouts without a datacenter field report `datacenter_id` as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SnowflakeParts {
    /// Milliseconds since the layout's epoch.
    pub timestamp: u64,
    /// Datacenter id, zero for layouts without one.
    pub datacenter_id: u64,
    /// Worker id.
    pub worker_id: u64,
    /// Per-millisecond sequence number.
    pub sequence: u64,
}

impl SnowflakeParts {
    /// Converts the relative timestamp into a wall-clock time, given the epoch
    /// it was encoded against.
    pub fn time(&self, epoch: Duration) -> SystemTime {
        let millis = (epoch.as_millis() as u64).saturating_add(self.timestamp);
        from_unix_millis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}
