use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Category name must not be empty")]
    EmptyCategoryName,
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),
    #[error("Category limit must be a finite amount >= 0, got {0}")]
    InvalidLimit(f64),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(Uuid),
    #[error("Reward rate must be a finite amount > 0, got {0}")]
    InvalidRate(f64),
    #[error("Wallet must contain at least one payment instrument")]
    EmptyWallet,
    #[error("Purchase amount must be greater than zero, got {0}")]
    InvalidAmount(f64),
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(Uuid),
}

pub type CoreResult<T> = Result<T, CoreError>;
