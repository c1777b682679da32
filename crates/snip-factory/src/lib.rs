//! Key factory for the snip URL shortener.
//!
//! [`KeyFactory`] validates URLs and turns candidate keys from a
//! [`KeyGenerator`](snip_generator::KeyGenerator) into keys that are free in
//! the [`Store`](snip_core::Store).

pub mod error;
pub mod factory;
pub mod validate;

pub use error::FactoryError;
pub use factory::{FactorySettings, KeyFactory};
pub use validate::validate_url;
