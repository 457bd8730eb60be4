//! Error taxonomy

use thiserror::Error;

/// Failures of the code store and issuer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not allocate an unused code")]
    Exhausted,
}

/// Failures of the wallet adapter
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet provider unavailable")]
    Unavailable,

    #[error("no account connected")]
    NotConnected,

    #[error("account request rejected: {0}")]
    Rejected(String),
}
