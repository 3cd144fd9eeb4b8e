//! Unified application error type.
//! All modules (db, core, http, cli) return AppError so that every failure
//! reaches the client through the same envelope.

use std::io;
use thiserror::Error;

use crate::core::relay::RelayError;
use crate::core::token::TokenError;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Business outcomes
    // ---------------------------
    #[error("not found error")]
    NotFound,

    #[error("conflicted")]
    Conflicted,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not premium user")]
    NotPremium,

    // ---------------------------
    // Request shape
    // ---------------------------
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unprocessable entity: {0}")]
    UnprocessableEntity(String),

    // ---------------------------
    // Infrastructure
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures whose detail must stay server-side.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            AppError::NotFound
                | AppError::Conflicted
                | AppError::Unauthorized
                | AppError::Forbidden
                | AppError::NotPremium
                | AppError::BadRequest(_)
                | AppError::UnprocessableEntity(_)
                | AppError::InvalidDate(_)
                | AppError::Token(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
