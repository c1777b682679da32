use crate::error::{FactoryError, Result};
use crate::validate::validate_url;
use snip_core::{Key, Store};
use snip_generator::KeyGenerator;
use std::sync::Arc;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// Default bound on candidates tried per call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1024;

/// Configures a [`KeyFactory`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct FactorySettings {
    /// How many candidate keys to try before giving up with
    /// [`FactoryError::Exhausted`]. With the default random generator a
    /// collision is already unlikely, so hitting this limit means the
    /// generator is stuck or the key space is nearly full.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// When set, [`KeyFactory::shorten`] hands back the existing key for a
    /// URL that is already stored instead of issuing a new one.
    #[builder(default = false)]
    pub reuse_existing: bool,
}

impl Default for FactorySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Produces keys that are free in the store.
///
/// The factory shares the store with whoever else reads and writes it; it
/// is handed an `Arc` rather than owning a private copy.
///
/// Two paths are offered:
/// - [`generate`](Self::generate) only checks that a candidate is unused and
///   leaves the insert to the caller. Another writer can take the same key
///   between the check and the caller's `set`.
/// - [`shorten`](Self::shorten) claims the key with
///   [`Store::insert_if_absent`], so the check and the write are one
///   transaction and the returned key is already stored.
#[derive(Debug)]
pub struct KeyFactory<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: FactorySettings,
}

impl<S, G> Clone for KeyFactory<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings,
        }
    }
}

impl<S: Store, G: KeyGenerator> KeyFactory<S, G> {
    /// Creates a new `KeyFactory` with default settings.
    pub fn new(store: Arc<S>, generator: G) -> Self {
        Self::with_settings(store, generator, FactorySettings::default())
    }

    /// Creates a new `KeyFactory` with custom settings.
    pub fn with_settings(store: Arc<S>, generator: G, settings: FactorySettings) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &FactorySettings {
        &self.settings
    }

    /// Returns a key that is absent from the store at the time of the call.
    ///
    /// The key is not inserted. Invalid URLs are rejected before the
    /// generator or the store is touched.
    pub async fn generate(&self, url: &str) -> Result<Key> {
        validate_url(url)?;

        for attempt in 1..=self.settings.max_attempts {
            let candidate = self.next_candidate();
            if !self.store.contains(&candidate).await? {
                return Ok(candidate);
            }
            debug!(key = %candidate, attempt, "candidate key already taken");
        }

        Err(self.exhausted())
    }

    /// Stores `url` under a fresh key and returns the key.
    pub async fn shorten(&self, url: &str) -> Result<Key> {
        validate_url(url)?;

        // The lookup and the insert below are separate transactions, so two
        // concurrent calls for a new URL may still end up with two keys.
        if self.settings.reuse_existing {
            if let Some(existing) = self.store.get_by_value(url).await?.into_iter().next() {
                debug!(key = %existing, "reusing existing key");
                return Ok(existing);
            }
        }

        for attempt in 1..=self.settings.max_attempts {
            let candidate = self.next_candidate();
            if self
                .store
                .insert_if_absent(&candidate, url.to_owned())
                .await?
            {
                debug!(key = %candidate, attempt, "claimed key");
                return Ok(candidate);
            }
            debug!(key = %candidate, attempt, "candidate key already taken");
        }

        Err(self.exhausted())
    }

    fn next_candidate(&self) -> Key {
        self.generator.generate().into()
    }

    fn exhausted(&self) -> FactoryError {
        let attempts = self.settings.max_attempts;
        warn!(attempts, "no free key found");
        FactoryError::Exhausted { attempts }
    }
}
