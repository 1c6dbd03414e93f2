use core::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CombGenerator, CombGuid, CombLayout, CombProvider, Error, NoRepeatClock, Result,
    SeataConfig, SeataGenerator, SnowflakeGenerator, SystemClock, ThreadRandom, TimeSource,
    TwitterConfig, TwitterGenerator,
};

/// The kind of identifier a caller asks for.
///
/// Callers persist the numeric tag (`u8::from(style)`), so tags are fixed
/// forever: new styles take new numbers and existing ones are never
/// renumbered or reused.
///
/// | tag | style |
/// |----:|-------|
/// | 0 | [`Basic`](Self::Basic) |
/// | 1 | [`SnowflakeTwitter`](Self::SnowflakeTwitter) |
/// | 2 | [`SnowflakeSeata`](Self::SnowflakeSeata) |
/// | 3 | [`CombSqlServer`](Self::CombSqlServer) |
/// | 4 | [`CombPostgreSql`](Self::CombPostgreSql) |
/// | 5 | [`CombSqlServerLegacy`](Self::CombSqlServerLegacy) |
/// | 6 | [`SequentialAsString`](Self::SequentialAsString) |
/// | 7 | [`SequentialAsBinary`](Self::SequentialAsBinary) |
/// | 8 | [`SequentialAtEnd`](Self::SequentialAtEnd) |
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum IdStyle {
    /// A random version 4 GUID.
    Basic = 0,
    /// A strict 64-bit Snowflake.
    SnowflakeTwitter = 1,
    /// A tolerant 64-bit Snowflake.
    SnowflakeSeata = 2,
    /// COMB, [`CombLayout::SqlServer`].
    CombSqlServer = 3,
    /// COMB, [`CombLayout::PostgreSql`].
    CombPostgreSql = 4,
    /// COMB, [`CombLayout::SqlServerLegacy`].
    CombSqlServerLegacy = 5,
    /// COMB, [`CombLayout::SequentialAsString`].
    SequentialAsString = 6,
    /// COMB, [`CombLayout::SequentialAsBinary`].
    SequentialAsBinary = 7,
    /// COMB, [`CombLayout::SequentialAtEnd`].
    SequentialAtEnd = 8,
}

impl IdStyle {
    /// Every style, in tag order.
    pub const ALL: [Self; 9] = [
        Self::Basic,
        Self::SnowflakeTwitter,
        Self::SnowflakeSeata,
        Self::CombSqlServer,
        Self::CombPostgreSql,
        Self::CombSqlServerLegacy,
        Self::SequentialAsString,
        Self::SequentialAsBinary,
        Self::SequentialAtEnd,
    ];

    /// The persisted tag; same as `u8::from(self)`.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// The COMB layout behind this style, if it is a COMB style.
    pub const fn comb_layout(self) -> Option<CombLayout> {
        match self {
            Self::CombSqlServer => Some(CombLayout::SqlServer),
            Self::CombPostgreSql => Some(CombLayout::PostgreSql),
            Self::CombSqlServerLegacy => Some(CombLayout::SqlServerLegacy),
            Self::SequentialAsString => Some(CombLayout::SequentialAsString),
            Self::SequentialAsBinary => Some(CombLayout::SequentialAsBinary),
            Self::SequentialAtEnd => Some(CombLayout::SequentialAtEnd),
            Self::Basic | Self::SnowflakeTwitter | Self::SnowflakeSeata => None,
        }
    }

    /// Returns `true` for the 64-bit styles.
    pub const fn is_snowflake(self) -> bool {
        matches!(self, Self::SnowflakeTwitter | Self::SnowflakeSeata)
    }
}

impl From<IdStyle> for u8 {
    fn from(style: IdStyle) -> Self {
        style.tag()
    }
}

impl TryFrom<u8> for IdStyle {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(Error::UnknownStyle(tag))
    }
}

/// An identifier produced by [`IdFactory::generate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratedId {
    Int64(i64),
    Guid(CombGuid),
}

impl GeneratedId {
    /// The 64-bit value, if this is one.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(id) => Some(*id),
            Self::Guid(_) => None,
        }
    }

    /// The GUID, if this is one.
    pub const fn as_guid(&self) -> Option<CombGuid> {
        match self {
            Self::Int64(_) => None,
            Self::Guid(guid) => Some(*guid),
        }
    }
}

impl fmt::Display for GeneratedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(id) => write!(f, "{id}"),
            Self::Guid(guid) => write!(f, "{guid}"),
        }
    }
}

/// Settings for every strategy an [`IdFactory`] builds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Settings of the strict 64-bit strategy.
    pub twitter: TwitterConfig,
    /// Settings of the tolerant 64-bit strategy.
    pub seata: SeataConfig,
    /// Route COMB clock readings through one [`NoRepeatClock`] shared by all
    /// COMB styles of the factory.
    pub no_repeat: bool,
}

/// Clock handed to the factory's COMB generators.
#[derive(Clone, Debug)]
enum FactoryClock {
    System(SystemClock),
    NoRepeat(NoRepeatClock),
}

impl TimeSource for FactoryClock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::NoRepeat(clock) => clock.current_millis(),
        }
    }
}

/// Maps an [`IdStyle`] to a ready-built strategy.
///
/// Every strategy is built once in [`IdFactory::new`]; the 64-bit generators
/// keep their state for the factory's lifetime, so share one factory per
/// worker identity.
///
/// # Example
/// ```
/// use combflake::{FactoryConfig, IdFactory, IdStyle};
///
/// let factory = IdFactory::new(FactoryConfig::default()).unwrap();
///
/// let order_id = factory.generate(IdStyle::SnowflakeTwitter).unwrap();
/// assert!(order_id.as_i64().unwrap() > 0);
///
/// let row_key = factory.generate(IdStyle::try_from(3).unwrap()).unwrap();
/// assert!(row_key.as_guid().is_some());
/// ```
#[derive(Debug)]
pub struct IdFactory {
    twitter: TwitterGenerator,
    seata: SeataGenerator,
    combs: [CombGenerator<FactoryClock, ThreadRandom>; 6],
}

impl IdFactory {
    /// Builds every strategy.
    ///
    /// # Errors
    /// Any construction error of the 64-bit generators.
    pub fn new(config: FactoryConfig) -> Result<Self> {
        let clock = if config.no_repeat {
            FactoryClock::NoRepeat(NoRepeatClock::default())
        } else {
            FactoryClock::System(SystemClock)
        };
        let comb = |layout| CombGenerator::with_sources(layout, clock.clone(), ThreadRandom);

        Ok(Self {
            twitter: TwitterGenerator::with_config(config.twitter, SystemClock)?,
            seata: SeataGenerator::with_config(config.seata, SystemClock)?,
            combs: [
                comb(CombLayout::SqlServer),
                comb(CombLayout::PostgreSql),
                comb(CombLayout::SqlServerLegacy),
                comb(CombLayout::SequentialAsString),
                comb(CombLayout::SequentialAsBinary),
                comb(CombLayout::SequentialAtEnd),
            ],
        })
    }

    /// Generates one identifier of the requested style.
    ///
    /// # Errors
    /// Only [`IdStyle::SnowflakeTwitter`] can fail; see
    /// [`TwitterGenerator::try_next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, style: IdStyle) -> Result<GeneratedId> {
        if let Some(generator) = self.snowflake(style) {
            return generator.try_next_id().map(GeneratedId::Int64);
        }
        Ok(GeneratedId::Guid(match self.comb(style) {
            Some(generator) => generator.create(),
            None => CombGuid::new_random(),
        }))
    }

    /// The 64-bit strategy behind `style`, if any.
    pub fn snowflake(&self, style: IdStyle) -> Option<&dyn SnowflakeGenerator> {
        match style {
            IdStyle::SnowflakeTwitter => Some(&self.twitter),
            IdStyle::SnowflakeSeata => Some(&self.seata),
            _ => None,
        }
    }

    /// The COMB strategy behind `style`, if any.
    pub fn comb(&self, style: IdStyle) -> Option<&dyn CombProvider> {
        let layout = style.comb_layout()?;
        self.combs
            .iter()
            .find(|generator| generator.layout() == layout)
            .map(|generator| generator as &dyn CombProvider)
    }
}
