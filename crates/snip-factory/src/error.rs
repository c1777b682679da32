use snip_core::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FactoryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("no free key found after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
