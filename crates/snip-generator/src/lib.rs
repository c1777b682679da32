pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use snip_core::Key;

/// Trait for generating candidate keys.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness against the store is checked by the key factory, so a
/// generator may repeat itself; it only has to eventually produce a free key.
pub trait KeyGenerator: Send + Sync + 'static {
    type Output: Into<Key>;

    /// Produces the next candidate key.
    fn generate(&self) -> Self::Output;
}

/// A generator backed by a closure returning strings.
///
/// Created with [`from_fn`].
#[derive(Debug, Clone)]
pub struct FromFn<F>(F);

/// Adapts any string-producing closure into a [`KeyGenerator`].
///
/// The strings are trusted as keys without validation.
///
/// ```
/// use snip_generator::{from_fn, KeyGenerator};
///
/// let generator = from_fn(|| "fixed".to_string());
/// assert_eq!(generator.generate().as_str(), "fixed");
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn() -> String + Send + Sync + 'static,
{
    FromFn(f)
}

impl<F> KeyGenerator for FromFn<F>
where
    F: Fn() -> String + Send + Sync + 'static,
{
    type Output = Key;

    fn generate(&self) -> Self::Output {
        Key::new_unchecked((self.0)())
    }
}
