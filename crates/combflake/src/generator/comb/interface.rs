use std::time::SystemTime;

use crate::{CombGuid, CombLayout, from_unix_millis, to_unix_millis};

/// A minimal interface for generating COMB GUIDs.
///
/// Only [`Self::layout`] and the two clock/seed sources are left to the
/// implementor; embedding and extraction are the layout's pure transforms.
pub trait CombProvider {
    /// The byte layout this provider writes.
    fn layout(&self) -> CombLayout;

    /// A random seed stamped with the provider's current time.
    fn create(&self) -> CombGuid;

    /// `seed` stamped with the provider's current time.
    fn create_from(&self, seed: [u8; 16]) -> CombGuid;

    /// A random seed stamped with `timestamp`.
    fn create_at(&self, timestamp: SystemTime) -> CombGuid;

    /// `seed` stamped with `timestamp`. Deterministic.
    fn create_with(&self, seed: [u8; 16], timestamp: SystemTime) -> CombGuid {
        CombGuid::from_bytes(self.layout().encode(seed, to_unix_millis(timestamp)))
    }

    /// Extracts the embedded time, at the layout's resolution.
    ///
    /// The value is not checked for provenance: bytes from another layout (or
    /// no COMB at all) decode to some meaningless time.
    fn timestamp(&self, value: &CombGuid) -> SystemTime {
        from_unix_millis(self.layout().decode(value.as_bytes()))
    }
}
