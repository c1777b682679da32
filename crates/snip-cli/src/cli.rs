use clap::builder::RangedU64ValueParser;
use clap::Parser;
use snip_core::Key;
use snip_factory::factory::DEFAULT_MAX_ATTEMPTS;
use snip_generator::random::DEFAULT_LENGTH;

pub const KEY_LENGTH_ENV: &str = "SNIP_KEY_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "SNIP_MAX_ATTEMPTS";
pub const CAPACITY_ENV: &str = "SNIP_CAPACITY";
pub const REUSE_EXISTING_ENV: &str = "SNIP_REUSE_EXISTING";
pub const SEED_ENV: &str = "SNIP_SEED";
pub const BASE_URL_ENV: &str = "SNIP_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/u";

#[derive(Debug, Parser)]
#[command(name = "snip", about = "Shorten URLs from an interactive shell")]
pub struct CLI {
    /// Length of generated keys.
    #[arg(
        long,
        env = KEY_LENGTH_ENV,
        default_value_t = DEFAULT_LENGTH,
        value_parser = RangedU64ValueParser::<usize>::new()
            .range(Key::MIN_LENGTH as u64..=Key::MAX_LENGTH as u64)
    )]
    pub key_length: usize,

    /// Candidate keys to try before giving up.
    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Maximum number of stored URLs. Unbounded when unset.
    #[arg(long, env = CAPACITY_ENV)]
    pub capacity: Option<usize>,

    /// Return the existing key when a URL is shortened twice.
    #[arg(long, env = REUSE_EXISTING_ENV)]
    pub reuse_existing: bool,

    /// Seed for the key generator, for reproducible keys.
    #[arg(long, env = SEED_ENV)]
    pub seed: Option<u64>,

    /// Public base URL short links are printed under.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}
