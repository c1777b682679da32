use crate::KeyGenerator;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snip_core::{CoreError, Key};

/// Key length used by [`RandomGenerator::default`].
pub const DEFAULT_LENGTH: usize = 10;

/// The 52-letter alphabet keys are drawn from.
pub const LETTERS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates fixed-length keys of letters drawn uniformly at random.
///
/// The random source is seeded once when the generator is built and shared
/// by every call, so rapid successive calls do not reuse a seed.
#[derive(Debug)]
pub struct RandomGenerator {
    length: usize,
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    /// Creates a generator producing keys of `length` letters, seeded from the OS.
    pub fn new(length: usize) -> Result<Self, CoreError> {
        Self::with_rng(length, StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed. The same seed and length
    /// always yield the same sequence of keys.
    pub fn seeded(length: usize, seed: u64) -> Result<Self, CoreError> {
        Self::with_rng(length, StdRng::seed_from_u64(seed))
    }

    fn with_rng(length: usize, rng: StdRng) -> Result<Self, CoreError> {
        if !(Key::MIN_LENGTH..=Key::MAX_LENGTH).contains(&length) {
            return Err(CoreError::InvalidKey(format!(
                "generated key length must be between {} and {}, got {}",
                Key::MIN_LENGTH,
                Key::MAX_LENGTH,
                length
            )));
        }

        Ok(Self::from_parts(length, rng))
    }

    /// Callers must have checked `length` against the key bounds.
    fn from_parts(length: usize, rng: StdRng) -> Self {
        Self {
            length,
            rng: Mutex::new(rng),
        }
    }

    /// Returns the length of the generated keys.
    pub fn length(&self) -> usize {
        self.length
    }
}

const _: () = assert!(DEFAULT_LENGTH >= Key::MIN_LENGTH && DEFAULT_LENGTH <= Key::MAX_LENGTH);

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::from_parts(DEFAULT_LENGTH, StdRng::from_os_rng())
    }
}

impl KeyGenerator for RandomGenerator {
    type Output = Key;

    fn generate(&self) -> Self::Output {
        let mut rng = self.rng.lock();
        let key: String = (0..self.length)
            .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
            .collect();
        Key::new_unchecked(key)
    }
}
