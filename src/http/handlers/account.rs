use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use crate::errors::AppResult;
use crate::http::response::{Envelope, Status};
use crate::http::session::{
    CHECKIN_COOKIE, SESSION_COOKIE, Session, removal_cookie, token_cookie,
};
use crate::http::{AppState, blocking, decode};
use crate::models::employee::{LoginRequest, RegisterRequest};

pub async fn register(State(state): State<AppState>, body: Bytes) -> AppResult<impl IntoResponse> {
    let req: RegisterRequest = decode(&body)?;
    req.validate()?;

    let account = blocking(move || state.accounts.register(&req)).await?;
    Ok(Envelope::success(Status::Created, account))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let req: LoginRequest = decode(&body)?;
    req.validate()?;

    let outcome = blocking(move || state.accounts.login(&req)).await?;
    let jar = jar.add(token_cookie(SESSION_COOKIE, outcome.token));

    Ok((jar, Envelope::success(Status::Ok, outcome.account)))
}

/// Drop both cookies. Tokens are stateless, so nothing is revoked server-side.
pub async fn logout(Session(_): Session, jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .add(removal_cookie(SESSION_COOKIE))
        .add(removal_cookie(CHECKIN_COOKIE));

    (jar, Envelope::success(Status::Ok, "logged out"))
}
