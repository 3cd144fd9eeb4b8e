//! Cookie-borne claims.
//!
//! `Session` and `Checkin` are extractors: a handler that names one of them
//! only runs once the matching cookie has parsed and verified. Anything else
//! (missing cookie, bad signature, expired, wrong claim kind) is 401.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

use super::AppState;
use crate::errors::AppError;
use crate::models::claims::{CheckinClaim, SessionClaim};

pub const SESSION_COOKIE: &str = "token";
pub const CHECKIN_COOKIE: &str = "checkin-token";

/// Verified login session.
#[derive(Debug, Clone)]
pub struct Session(pub SessionClaim);

/// Verified open check-in.
#[derive(Debug, Clone)]
pub struct Checkin(pub CheckinClaim);

fn cookie_value(parts: &Parts, name: &str) -> Result<String, AppError> {
    CookieJar::from_headers(&parts.headers)
        .get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            debug!(cookie = name, "missing cookie");
            AppError::Unauthorized
        })
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = cookie_value(parts, SESSION_COOKIE)?;
        let claim = state.tokens.parse_session(&token).map_err(|e| {
            debug!(error = %e, "session token rejected");
            AppError::Unauthorized
        })?;
        Ok(Session(claim))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Checkin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = cookie_value(parts, CHECKIN_COOKIE)?;
        let claim = state.tokens.parse_checkin(&token).map_err(|e| {
            debug!(error = %e, "checkin token rejected");
            AppError::Unauthorized
        })?;
        Ok(Checkin(claim))
    }
}

/// `HttpOnly`, site-wide cookie carrying `value`.
pub fn token_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value)).path("/").http_only(true).build()
}

/// Cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut c = token_cookie(name, String::new());
    c.make_removal();
    c
}
