//! Store implementations for snip.

pub mod memory;

pub use memory::MemoryStore;
pub use snip_core::{ReadStore, Store, StoreError};
