use crate::KeyGenerator;
use snip_core::Key;
use std::sync::atomic::{AtomicU64, Ordering};

/// A sequential key generator.
///
/// Produces keys like "wh000000", "wh000001", etc. Keys never repeat within
/// one instance, which makes this generator useful for deterministic tests
/// and for setups where readable keys matter more than unguessable ones.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a new sequential generator starting from a specific counter value.
    ///
    /// Useful for resuming from a known state.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl KeyGenerator for SeqGenerator {
    type Output = Key;

    fn generate(&self) -> Self::Output {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        Key::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}
