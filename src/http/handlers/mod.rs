//! Request handlers: decode, validate, dispatch, wrap in the envelope.

pub mod account;
pub mod activity;
pub mod attendance;

use super::response::{Envelope, Status};
use crate::errors::AppError;

pub async fn health() -> Envelope<&'static str> {
    Envelope::success(Status::Ok, "up")
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
