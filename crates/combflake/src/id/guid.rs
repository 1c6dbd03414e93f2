use core::{fmt, str::FromStr};

use crate::{Error, RandSource, ThreadRandom};

/// A 128-bit identifier stored as 16 raw bytes.
///
/// The bytes are kept exactly in the order the COMB layouts write them.
/// The text form (`8-4-4-4-12` lowercase hex) follows GUID field order: the
/// first three groups are little-endian, so bytes `0..4`, `4..6` and `6..8`
/// are each printed reversed and the last eight bytes are printed as stored.
/// `FromStr` undoes the same swap.
///
/// This is the form engines that compare GUIDs as text see, and the reason
/// the string-ordered COMB layouts pre-reverse their time bytes.
///
/// # Example
/// ```
/// use combflake::CombGuid;
///
/// let guid = CombGuid::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
/// assert_eq!(guid.to_string(), "03020100-0504-0706-0809-0a0b0c0d0e0f");
/// assert_eq!(guid.to_string().parse::<CombGuid>().unwrap(), guid);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CombGuid([u8; 16]);

impl CombGuid {
    /// The all-zero value.
    pub const NIL: Self = Self([0; 16]);

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// The stored bytes read as one big-endian integer.
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// A random RFC 4122 version 4 value from the thread-local RNG.
    pub fn new_random() -> Self {
        Self::from_random_bytes(ThreadRandom.rand())
    }

    /// Stamps the version 4 and RFC 4122 variant bits onto random bytes.
    ///
    /// The version nibble lands in the high half of byte 7, which the text
    /// form prints first in its third group.
    pub const fn from_random_bytes(mut bytes: [u8; 16]) -> Self {
        bytes[7] = (bytes[7] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }
}

impl From<[u8; 16]> for CombGuid {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<CombGuid> for [u8; 16] {
    fn from(guid: CombGuid) -> Self {
        guid.0
    }
}

/// Stored byte index for each position of the text form.
const TEXT_ORDER: [usize; 16] = [3, 2, 1, 0, 5, 4, 7, 6, 8, 9, 10, 11, 12, 13, 14, 15];

impl fmt::Display for CombGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &index) in TEXT_ORDER.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", self.0[index])?;
        }
        Ok(())
    }
}

impl fmt::Debug for CombGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombGuid({self})")
    }
}

impl FromStr for CombGuid {
    type Err = Error;

    /// Parses the hyphenated form, or 32 bare hex digits, in GUID field
    /// order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const HYPHENS: [usize; 4] = [8, 13, 18, 23];

        let raw = s.as_bytes();
        let digits: Vec<u8> = match raw.len() {
            32 => raw.to_vec(),
            36 => {
                if HYPHENS.iter().any(|&i| raw[i] != b'-') {
                    return Err(Error::InvalidGuid);
                }
                raw.iter()
                    .enumerate()
                    .filter(|(i, _)| !HYPHENS.contains(i))
                    .map(|(_, &c)| c)
                    .collect()
            }
            _ => return Err(Error::InvalidGuid),
        };

        let mut bytes = [0; 16];
        for (&index, pair) in TEXT_ORDER.iter().zip(digits.chunks_exact(2)) {
            bytes[index] = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
        }
        Ok(Self(bytes))
    }
}

const fn hex_value(c: u8) -> Result<u8, Error> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::InvalidGuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let bytes: [u8; 16] = core::array::from_fn(|i| i as u8);
        let guid = CombGuid::from_bytes(bytes);
        let text = guid.to_string();
        assert_eq!(text, "03020100-0504-0706-0809-0a0b0c0d0e0f");
        assert_eq!(text.parse::<CombGuid>(), Ok(guid));
        assert_eq!(
            "030201000504070608090A0B0C0D0E0F".parse::<CombGuid>(),
            Ok(guid)
        );
        assert_eq!(format!("{guid:?}"), format!("CombGuid({text})"));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "",
            "00010203-0405-0607-0809-0a0b0c0d0e0",
            "00010203_0405-0607-0809-0a0b0c0d0e0f",
            "0001020304050607080g0a0b0c0d0e0f",
            "00010203-0405-0607-0809-0a0b0c0d0é0",
        ] {
            assert_eq!(bad.parse::<CombGuid>(), Err(Error::InvalidGuid), "{bad}");
        }
    }

    #[test]
    fn random_values_carry_version_bits() {
        let guid = CombGuid::new_random();
        assert_eq!(guid.as_bytes()[7] >> 4, 4);
        assert_eq!(guid.as_bytes()[8] >> 6, 0b10);
        assert_eq!(guid.to_string().as_bytes()[14], b'4');
        assert_ne!(guid, CombGuid::new_random());
    }

    #[test]
    fn u128_is_big_endian() {
        let mut bytes = [0; 16];
        bytes[15] = 1;
        assert_eq!(CombGuid::from_bytes(bytes).to_u128(), 1);
    }
}
