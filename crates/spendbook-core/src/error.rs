use spendbook_domain::{DateParseError, ViewError};
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Category `{0}` cannot be deleted")]
    ProtectedCategory(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Date(#[from] DateParseError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CoreError {
    /// True for input problems the user can correct; nothing was mutated.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::DuplicateCategory(_)
                | CoreError::ProtectedCategory(_)
                | CoreError::Date(_)
                | CoreError::View(_)
        )
    }
}
