use crate::{Error, Result, SnowflakeParts, id::mask};

/// Bit layout of the tolerant (Seata-style) 64-bit Snowflake ID.
///
/// The worker id sits **above** the timestamp, so IDs from one worker sort
/// together rather than interleaving with other workers by time. The lower
/// timestamp and sequence fields form a single counter that only ever
/// increments; sequence overflow carries into the timestamp.
///
/// - 1 bit reserved (sign)
/// - 10 bits worker ID
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63   62          53 52            12 11             0
///              +---+--------------+----------------+---------------+
///  Field:      | 0 | worker (10)  | timestamp (41) | sequence (12) |
///              +---+--------------+----------------+---------------+
///              |<-------- MSB ------- 64 bits ------- LSB -------->|
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeataLayout {
    /// Width of the worker id field.
    pub worker_bits: u32,
    /// Width of the timestamp field.
    pub timestamp_bits: u32,
    /// Width of the sequence field.
    pub sequence_bits: u32,
}

impl Default for SeataLayout {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl SeataLayout {
    /// The 10/41/12 layout.
    pub const CLASSIC: Self = Self {
        worker_bits: 10,
        timestamp_bits: 41,
        sequence_bits: 12,
    };

    /// Checks that the fields fill exactly the 63 non-sign bits.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLayout`] otherwise.
    pub const fn validate(&self) -> Result<()> {
        let bits = self
            .worker_bits
            .saturating_add(self.timestamp_bits)
            .saturating_add(self.sequence_bits);
        if bits == 63 {
            Ok(())
        } else {
            Err(Error::InvalidLayout { bits })
        }
    }

    /// Largest encodable worker id.
    pub const fn max_worker_id(&self) -> u64 {
        mask(self.worker_bits)
    }

    /// Largest timestamp, in ms since the epoch, the counter can hold.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    /// Largest sequence value before it carries into the timestamp.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Mask over the combined timestamp and sequence counter.
    pub const fn counter_mask(&self) -> u64 {
        mask(self.timestamp_bits + self.sequence_bits)
    }

    /// Bit offset of the worker id field.
    pub const fn worker_shift(&self) -> u32 {
        self.timestamp_bits + self.sequence_bits
    }

    /// Packs a raw counter value (timestamp and sequence) under a worker id.
    pub const fn from_counter(&self, worker_id: u64, counter: u64) -> i64 {
        let worker = (worker_id & self.max_worker_id()) << self.worker_shift();
        (worker | (counter & self.counter_mask())) as i64
    }

    /// Packs `parts` into an ID. `datacenter_id` is ignored.
    pub const fn compose(&self, parts: &SnowflakeParts) -> i64 {
        let counter = ((parts.timestamp & self.max_timestamp()) << self.sequence_bits)
            | (parts.sequence & self.max_sequence());
        self.from_counter(parts.worker_id, counter)
    }

    /// Splits an ID back into its fields.
    pub const fn decompose(&self, id: i64) -> SnowflakeParts {
        let raw = id as u64;
        SnowflakeParts {
            timestamp: (raw >> self.sequence_bits) & self.max_timestamp(),
            datacenter_id: 0,
            worker_id: (raw >> self.worker_shift()) & self.max_worker_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}
