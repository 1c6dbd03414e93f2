/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `combflake` can emit.
///
/// Configuration errors are only raised while constructing a generator. Once a
/// generator exists, the only runtime failures come from the strict Snowflake
/// generator observing a misbehaving clock, or from a poisoned lock.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker id does not fit in the bits the layout reserves for it.
    #[error("worker id {worker_id} exceeds the maximum of {max}")]
    WorkerIdOutOfRange {
        /// The rejected worker id.
        worker_id: u64,
        /// The largest worker id the layout can encode.
        max: u64,
    },

    /// The datacenter id does not fit in the bits the layout reserves for it.
    #[error("datacenter id {datacenter_id} exceeds the maximum of {max}")]
    DatacenterIdOutOfRange {
        /// The rejected datacenter id.
        datacenter_id: u64,
        /// The largest datacenter id the layout can encode.
        max: u64,
    },

    /// The layout's field widths do not add up to the 63 usable bits of an
    /// `i64`.
    #[error("layout uses {bits} bits, expected 63")]
    InvalidLayout {
        /// Total number of bits claimed by the layout.
        bits: u32,
    },

    /// The configured epoch lies after the current time.
    #[error("epoch {epoch} is later than the current time {now}")]
    EpochInFuture {
        /// The configured epoch, in milliseconds since the UNIX epoch.
        epoch: u64,
        /// The clock reading, in milliseconds since the UNIX epoch.
        now: u64,
    },

    /// The time since the epoch no longer fits the layout's timestamp field.
    ///
    /// Raised by the strict generator instead of wrapping the field, which
    /// would issue smaller (or repeated) IDs.
    #[error("timestamp {timestamp} ms exceeds the layout maximum of {max} ms")]
    TimestampOverflow {
        /// Milliseconds since the generator's epoch.
        timestamp: u64,
        /// The largest value the timestamp field can hold.
        max: u64,
    },

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// The generator state is left untouched. Retrying is up to the caller.
    #[error("clock moved backwards: last issued {last} ms, now {now} ms")]
    ClockMovedBackwards {
        /// The most recent timestamp embedded in an ID.
        last: u64,
        /// The clock reading that triggered the error.
        now: u64,
    },

    /// The sequence was exhausted and the clock did not advance within the
    /// configured spin budget.
    #[error("clock stuck at {last} ms after {spins} reads")]
    ClockStalled {
        /// The timestamp whose sequence space was exhausted.
        last: u64,
        /// How many clock reads were made before giving up.
        spins: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison and this
    /// variant is never constructed.
    #[error("lock poisoned")]
    LockPoisoned,

    /// A persisted style tag does not name any known [`crate::IdStyle`].
    #[error("unknown id style tag {0}")]
    UnknownStyle(u8),

    /// A string could not be parsed as a [`crate::CombGuid`].
    #[error("invalid guid string")]
    InvalidGuid,
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::PoisonError;
#[cfg(not(feature = "parking-lot"))]
// Collapse every poisoned guard into `LockPoisoned`
impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
