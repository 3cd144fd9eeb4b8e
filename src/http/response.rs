//! Uniform `{status, data}` response envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::AppError;

/// Symbolic status carried in every envelope; maps 1:1 to an HTTP code.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflicted,
    UnprocessableEntity,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> StatusCode {
        match self {
            Status::Ok => StatusCode::OK,
            Status::Created => StatusCode::CREATED,
            Status::BadRequest => StatusCode::BAD_REQUEST,
            Status::Unauthorized => StatusCode::UNAUTHORIZED,
            Status::Forbidden => StatusCode::FORBIDDEN,
            Status::NotFound => StatusCode::NOT_FOUND,
            Status::Conflicted => StatusCode::CONFLICT,
            Status::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            Status::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::NotFound => Status::NotFound,
            AppError::Conflicted => Status::Conflicted,
            AppError::Unauthorized | AppError::Token(_) => Status::Unauthorized,
            AppError::Forbidden | AppError::NotPremium => Status::Forbidden,
            AppError::BadRequest(_) | AppError::InvalidDate(_) => Status::BadRequest,
            AppError::UnprocessableEntity(_) => Status::UnprocessableEntity,
            _ => Status::InternalServerError,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: Status, data: T) -> Self {
        Self {
            status,
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status.code(), Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = Status::from(&self);

        if self.is_internal() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, "request rejected");
        }

        Envelope::<()> { status, data: None }.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::TokenError;

    #[test]
    fn symbolic_codes_serialize_as_expected() {
        let pairs = [
            (Status::Ok, "\"OK\"", 200),
            (Status::Created, "\"CREATED\"", 201),
            (Status::BadRequest, "\"BAD_REQUEST\"", 400),
            (Status::Unauthorized, "\"UNAUTHORIZED\"", 401),
            (Status::Forbidden, "\"FORBIDDEN\"", 403),
            (Status::NotFound, "\"NOT_FOUND\"", 404),
            (Status::Conflicted, "\"CONFLICTED\"", 409),
            (Status::UnprocessableEntity, "\"UNPROCESSABLE_ENTITY\"", 422),
            (Status::InternalServerError, "\"INTERNAL_SERVER_ERROR\"", 500),
        ];
        for (status, json, code) in pairs {
            assert_eq!(serde_json::to_string(&status).unwrap(), json);
            assert_eq!(status.code().as_u16(), code);
        }
    }

    #[test]
    fn errors_map_to_statuses() {
        assert_eq!(Status::from(&AppError::Conflicted), Status::Conflicted);
        assert_eq!(
            Status::from(&AppError::Token(TokenError::Expired)),
            Status::Unauthorized
        );
        assert_eq!(
            Status::from(&AppError::InvalidDate("x".into())),
            Status::BadRequest
        );
        assert_eq!(
            Status::from(&AppError::Other("boom".into())),
            Status::InternalServerError
        );
    }
}
