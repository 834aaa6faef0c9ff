use thiserror::Error;

/// Errors raised by the stores and engines.
///
/// The shell wraps these in `anyhow::Error`; nothing below the shell retries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller input was rejected before anything was written.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No row matched the id for this owner. Missing ids and ids owned by
    /// somebody else look the same from the outside.
    #[error("no movement with id {id} for this user")]
    NotFound { id: i64 },

    /// An account with this email already exists.
    #[error("an account for {0} already exists")]
    DuplicateIdentity(String),

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
