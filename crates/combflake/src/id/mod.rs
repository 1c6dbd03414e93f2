mod comb;
mod guid;
mod parts;
mod seata;
mod twitter;

pub use comb::*;
pub use guid::*;
pub use parts::*;
pub use seata::*;
pub use twitter::*;

/// Mask with the low `bits` bits set.
#[inline]
pub(crate) const fn mask(bits: u32) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (64 - bits) }
}
