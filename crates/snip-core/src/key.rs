use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt::Display;

/// A short identifier addressing a stored URL.
///
/// Keys produced by generators are trusted and built with
/// [`Key::new_unchecked`]. Keys coming from callers (a path segment, a
/// command argument) go through [`Key::new`], which accepts 1-64 characters
/// from `[a-zA-Z0-9_-]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(SmolStr);

impl Key {
    /// Shortest key accepted by [`Key::new`].
    pub const MIN_LENGTH: usize = 1;
    /// Longest key accepted by [`Key::new`]. Generators must stay within it.
    pub const MAX_LENGTH: usize = 64;

    /// Creates a new `Key` after validating the input.
    pub fn new(key: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(SmolStr::new(key)))
    }

    /// Creates a `Key` without validation.
    ///
    /// Use this only for keys produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins the key onto the public base URL the keys are served under.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    fn validate(key: &str) -> std::result::Result<(), CoreError> {
        if key.len() < Self::MIN_LENGTH || key.len() > Self::MAX_LENGTH {
            return Err(CoreError::InvalidKey(format!(
                "length must be between {} and {}, got {}",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH,
                key.len()
            )));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidKey(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                key
            )));
        }

        Ok(())
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
