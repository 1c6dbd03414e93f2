use crate::{Error, Result, SnowflakeParts, id::mask};

/// Bit layout of the strict (Twitter-style) 64-bit Snowflake ID.
///
/// Fields are laid out from **most significant bit** to **least significant
/// bit**, below an always-clear sign bit. The default is the classic Twitter
/// split:
///
/// - 1 bit reserved (sign)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63   62            22 21        17 16     12 11             0
///              +---+----------------+------------+---------+---------------+
///  Field:      | 0 | timestamp (41) | dc (5)     | wkr (5) | sequence (12) |
///              +---+----------------+------------+---------+---------------+
///              |<------------- MSB ------- 64 bits ------- LSB ----------->|
/// ```
///
/// Custom widths are accepted as long as they add up to 63.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TwitterLayout {
    /// Width of the timestamp field.
    pub timestamp_bits: u32,
    /// Width of the datacenter id field.
    pub datacenter_bits: u32,
    /// Width of the worker id field.
    pub worker_bits: u32,
    /// Width of the sequence field.
    pub sequence_bits: u32,
}

impl Default for TwitterLayout {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl TwitterLayout {
    /// The 41/5/5/12 layout.
    pub const CLASSIC: Self = Self {
        timestamp_bits: 41,
        datacenter_bits: 5,
        worker_bits: 5,
        sequence_bits: 12,
    };

    /// Checks that the fields fill exactly the 63 non-sign bits.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLayout`] otherwise.
    pub const fn validate(&self) -> Result<()> {
        let bits = self
            .timestamp_bits
            .saturating_add(self.datacenter_bits)
            .saturating_add(self.worker_bits)
            .saturating_add(self.sequence_bits);
        if bits == 63 {
            Ok(())
        } else {
            Err(Error::InvalidLayout { bits })
        }
    }

    /// Largest timestamp, in ms since the epoch, the layout can hold.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    /// Largest encodable datacenter id.
    pub const fn max_datacenter_id(&self) -> u64 {
        mask(self.datacenter_bits)
    }

    /// Largest encodable worker id.
    pub const fn max_worker_id(&self) -> u64 {
        mask(self.worker_bits)
    }

    /// Largest sequence value within one millisecond.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Bit offset of the worker id field.
    pub const fn worker_shift(&self) -> u32 {
        self.sequence_bits
    }

    /// Bit offset of the datacenter id field.
    pub const fn datacenter_shift(&self) -> u32 {
        self.sequence_bits + self.worker_bits
    }

    /// Bit offset of the timestamp field.
    pub const fn timestamp_shift(&self) -> u32 {
        self.sequence_bits + self.worker_bits + self.datacenter_bits
    }

    /// Packs `parts` into an ID. Each field is masked to its width.
    pub const fn compose(&self, parts: &SnowflakeParts) -> i64 {
        let timestamp = (parts.timestamp & self.max_timestamp()) << self.timestamp_shift();
        let datacenter =
            (parts.datacenter_id & self.max_datacenter_id()) << self.datacenter_shift();
        let worker = (parts.worker_id & self.max_worker_id()) << self.worker_shift();
        let sequence = parts.sequence & self.max_sequence();
        (timestamp | datacenter | worker | sequence) as i64
    }

    /// Splits an ID back into its fields.
    pub const fn decompose(&self, id: i64) -> SnowflakeParts {
        let raw = id as u64;
        SnowflakeParts {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            datacenter_id: (raw >> self.datacenter_shift()) & self.max_datacenter_id(),
            worker_id: (raw >> self.worker_shift()) & self.max_worker_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}
