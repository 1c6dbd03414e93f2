/// A trait for random sources.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. COMB generators draw their 16-byte seeds from it,
/// and [`SeataGenerator::with_random_worker`] draws a worker id.
///
/// # Example
/// ```
/// use combflake::RandSource;
///
/// struct FixedRand;
/// impl RandSource<[u8; 16]> for FixedRand {
///     fn rand(&self) -> [u8; 16] {
///         [7; 16]
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), [7; 16]);
/// ```
///
/// [`SeataGenerator::with_random_worker`]: crate::SeataGenerator::with_random_worker
pub trait RandSource<T> {
    /// Returns a random value.
    fn rand(&self) -> T;
}
