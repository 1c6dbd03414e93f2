use rand::{Rng, rng};

use crate::RandSource;

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and automatically
/// reseeded periodically.
///
/// ⚠️ NOTE: The underlying `ThreadRng` is not `Send` or `Sync`. This type is a
/// zero-sized wrapper that does not store the RNG; it fetches the calling
/// thread's generator on every call, so it may be freely shared across
/// threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}

impl RandSource<[u8; 16]> for ThreadRandom {
    fn rand(&self) -> [u8; 16] {
        rng().random()
    }
}
