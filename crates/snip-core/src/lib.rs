//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the key type, the store contract and the error
//! types shared by the store, the generators and the key factory.

pub mod error;
pub mod key;
pub mod store;

pub use error::{CoreError, StoreError};
pub use key::Key;
pub use store::{ReadStore, Store};
