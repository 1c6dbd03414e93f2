use std::time::SystemTime;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CombGuid, CombLayout, CombProvider, NoRepeatClock, RandSource, SystemClock, ThreadRandom,
    TimeSource, to_unix_millis,
};

/// A COMB GUID generator for one [`CombLayout`].
///
/// Holds no mutable state of its own. The current time comes from the
/// injected [`TimeSource`]; passing a shared [`NoRepeatClock`] (see
/// [`Self::no_repeat`]) guarantees that every `create()` across all
/// generators sharing that clock embeds a strictly later timestamp.
///
/// # Example
/// ```
/// use combflake::{CombGenerator, CombLayout, CombProvider};
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let generator = CombGenerator::new(CombLayout::PostgreSql);
/// let at = UNIX_EPOCH + Duration::from_millis(1_735_689_600_123);
///
/// let guid = generator.create_at(at);
/// assert_eq!(generator.timestamp(&guid), at);
/// ```
#[derive(Clone, Debug)]
pub struct CombGenerator<T = SystemClock, R = ThreadRandom> {
    layout: CombLayout,
    clock: T,
    rng: R,
}

impl CombGenerator<SystemClock, ThreadRandom> {
    /// A generator on the system clock with thread-local random seeds.
    pub const fn new(layout: CombLayout) -> Self {
        Self {
            layout,
            clock: SystemClock,
            rng: ThreadRandom,
        }
    }

    /// Layout A.
    pub const fn sql_server() -> Self {
        Self::new(CombLayout::SqlServer)
    }

    /// Layout B.
    pub const fn postgre_sql() -> Self {
        Self::new(CombLayout::PostgreSql)
    }

    /// Layout C.
    pub const fn sql_server_legacy() -> Self {
        Self::new(CombLayout::SqlServerLegacy)
    }
}

impl<T: TimeSource> CombGenerator<NoRepeatClock<T>, ThreadRandom> {
    /// A generator whose clock-stamped values never repeat a timestamp among
    /// generators sharing `clock`.
    pub const fn no_repeat(layout: CombLayout, clock: NoRepeatClock<T>) -> Self {
        Self {
            layout,
            clock,
            rng: ThreadRandom,
        }
    }
}

impl<T, R> CombGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<[u8; 16]>,
{
    /// A generator with explicit clock and seed sources.
    pub const fn with_sources(layout: CombLayout, clock: T, rng: R) -> Self {
        Self { layout, clock, rng }
    }

    fn stamp(&self, seed: [u8; 16]) -> CombGuid {
        let now = i64::try_from(self.clock.current_millis()).unwrap_or(i64::MAX);
        CombGuid::from_bytes(self.layout.encode(seed, now))
    }
}

impl<T, R> CombProvider for CombGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<[u8; 16]>,
{
    fn layout(&self) -> CombLayout {
        self.layout
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn create(&self) -> CombGuid {
        self.stamp(self.rng.rand())
    }

    fn create_from(&self, seed: [u8; 16]) -> CombGuid {
        self.stamp(seed)
    }

    fn create_at(&self, timestamp: SystemTime) -> CombGuid {
        CombGuid::from_bytes(self.layout.encode(self.rng.rand(), to_unix_millis(timestamp)))
    }
}
