use core::time::Duration;

/// Milliseconds from 1900-01-01T00:00:00Z to the UNIX epoch (negative).
const SQL_BASE_MILLIS: i64 = -2_208_988_800_000;

/// Milliseconds from 0001-01-01T00:00:00Z to the UNIX epoch.
const SEQUENTIAL_OFFSET_MILLIS: i64 = 62_135_596_800_000;

const MILLIS_PER_DAY: i64 = 86_400_000;

const MILLIS_MASK: u64 = (1 << 48) - 1;

/// Where and how a COMB embeds its timestamp in 16 bytes.
///
/// Storage engines compare 16-byte keys in different orders, so a COMB only
/// clusters well when its time bytes sit where the engine looks first. Every
/// layout keeps the seed's remaining bytes untouched.
///
/// | layout                | time field                                   | bytes   |
/// |-----------------------|----------------------------------------------|---------|
/// | `SqlServer`           | ms since 1970, big-endian                    | 10..16  |
/// | `PostgreSql`          | ms since 1970, big-endian, then 0..4 and 4..6 reversed | 0..6 |
/// | `SqlServerLegacy`     | days since 1900 (2 B) + 1/300 s of day (4 B), each big-endian | 10..16 |
/// | `SequentialAsString`  | ms since 0001, big-endian, then 0..4 and 4..6 reversed | 0..6 |
/// | `SequentialAsBinary`  | ms since 0001, big-endian                    | 0..6    |
/// | `SequentialAtEnd`     | ms since 0001, big-endian                    | 10..16  |
///
/// Encoding and decoding are pure byte transforms. Decoding never checks
/// that the value came from the same layout, and fields that overflow their
/// width wrap silently: the millisecond fields hold 48 bits, and the legacy
/// day field covers 1900-01-01 through 2079-06-06.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombLayout {
    /// Layout A: SQL Server `uniqueidentifier` order, which compares the last
    /// six bytes first.
    SqlServer,
    /// Layout B: PostgreSQL `uuid` order, which compares the text form.
    PostgreSql,
    /// Layout C: SQL Server with a `datetime`-style day/tick split.
    SqlServerLegacy,
    /// Timestamp first, ordered for engines that sort GUIDs as strings.
    SequentialAsString,
    /// Timestamp first, ordered for engines that sort raw bytes.
    SequentialAsBinary,
    /// Timestamp last, ordered for SQL Server.
    SequentialAtEnd,
}

impl CombLayout {
    /// Writes `unix_millis` into `seed` according to this layout.
    ///
    /// # Example
    /// ```
    /// use combflake::CombLayout;
    ///
    /// let millis = 0x0102_0304_0506;
    /// let bytes = CombLayout::SqlServer.encode([0; 16], millis);
    /// assert_eq!(bytes[10..], [1, 2, 3, 4, 5, 6]);
    /// assert_eq!(CombLayout::SqlServer.decode(&bytes), millis);
    /// ```
    pub fn encode(self, seed: [u8; 16], unix_millis: i64) -> [u8; 16] {
        let mut bytes = seed;
        let since_0001 = unix_millis.wrapping_add(SEQUENTIAL_OFFSET_MILLIS);
        match self {
            Self::SqlServer => write_millis(&mut bytes, 10, unix_millis),
            Self::PostgreSql => {
                write_millis(&mut bytes, 0, unix_millis);
                swap_string_order(&mut bytes);
            }
            Self::SqlServerLegacy => write_legacy(&mut bytes, unix_millis),
            Self::SequentialAsString => {
                write_millis(&mut bytes, 0, since_0001);
                swap_string_order(&mut bytes);
            }
            Self::SequentialAsBinary => write_millis(&mut bytes, 0, since_0001),
            Self::SequentialAtEnd => write_millis(&mut bytes, 10, since_0001),
        }
        bytes
    }

    /// Reads the embedded timestamp back as milliseconds since the UNIX epoch.
    pub fn decode(self, bytes: &[u8; 16]) -> i64 {
        match self {
            Self::SqlServer => read_millis(bytes, 10),
            Self::PostgreSql => {
                let mut bytes = *bytes;
                swap_string_order(&mut bytes);
                read_millis(&bytes, 0)
            }
            Self::SqlServerLegacy => read_legacy(bytes),
            Self::SequentialAsString => {
                let mut bytes = *bytes;
                swap_string_order(&mut bytes);
                read_millis(&bytes, 0) - SEQUENTIAL_OFFSET_MILLIS
            }
            Self::SequentialAsBinary => read_millis(bytes, 0) - SEQUENTIAL_OFFSET_MILLIS,
            Self::SequentialAtEnd => read_millis(bytes, 10) - SEQUENTIAL_OFFSET_MILLIS,
        }
    }

    /// The value `decode(encode(_, unix_millis))` returns: `unix_millis`
    /// rounded down to this layout's resolution.
    pub fn truncate(self, unix_millis: i64) -> i64 {
        self.decode(&self.encode([0; 16], unix_millis))
    }

    /// Smallest time step the layout can tell apart.
    pub const fn resolution(self) -> Duration {
        match self {
            Self::SqlServerLegacy => Duration::from_nanos(10_000_000 / 3),
            _ => Duration::from_millis(1),
        }
    }

    /// Byte range holding the time field.
    pub const fn time_bytes(self) -> core::ops::Range<usize> {
        match self {
            Self::SqlServer | Self::SqlServerLegacy | Self::SequentialAtEnd => 10..16,
            Self::PostgreSql | Self::SequentialAsString | Self::SequentialAsBinary => 0..6,
        }
    }
}

fn write_millis(bytes: &mut [u8; 16], offset: usize, millis: i64) {
    let be = ((millis as u64) & MILLIS_MASK).to_be_bytes();
    bytes[offset..offset + 6].copy_from_slice(&be[2..]);
}

fn read_millis(bytes: &[u8; 16], offset: usize) -> i64 {
    let mut be = [0; 8];
    be[2..].copy_from_slice(&bytes[offset..offset + 6]);
    u64::from_be_bytes(be) as i64
}

/// Text-order fix-up: reverse the first 4-byte group and the following
/// 2-byte group.
fn swap_string_order(bytes: &mut [u8; 16]) {
    bytes[0..4].reverse();
    bytes[4..6].reverse();
}

fn write_legacy(bytes: &mut [u8; 16], unix_millis: i64) {
    let since_base = unix_millis.wrapping_sub(SQL_BASE_MILLIS);
    let days = since_base.div_euclid(MILLIS_PER_DAY);
    // 1/300 s ticks since midnight
    let ticks = since_base.rem_euclid(MILLIS_PER_DAY) * 3 / 10;

    bytes[10..12].copy_from_slice(&(days as u16).to_be_bytes());
    bytes[12..16].copy_from_slice(&(ticks as u32).to_be_bytes());
}

fn read_legacy(bytes: &[u8; 16]) -> i64 {
    let days = i64::from(u16::from_be_bytes([bytes[10], bytes[11]]));
    let ticks = i64::from(u32::from_be_bytes([
        bytes[12], bytes[13], bytes[14], bytes[15],
    ]));
    // First whole millisecond inside the tick, so re-encoding lands on the
    // same tick.
    let millis = (ticks * 10 + 2) / 3;
    SQL_BASE_MILLIS + days * MILLIS_PER_DAY + millis
}
