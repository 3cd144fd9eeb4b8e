use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::errors::{AppError, AppResult};
use crate::http::response::{Envelope, Status};
use crate::http::session::{CHECKIN_COOKIE, Checkin, Session, removal_cookie, token_cookie};
use crate::http::{AppState, blocking, decode};
use crate::models::attendance::AttendanceHistoryRequest;

pub async fn checkin(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let outcome = state.attendance.checkin(&session).await?;
    let jar = jar.add(token_cookie(CHECKIN_COOKIE, outcome.token));

    Ok((jar, Envelope::success(Status::Ok, outcome.attendance)))
}

/// Close the open record. The checkin cookie is dropped on success and also
/// when the record it names no longer exists.
pub async fn checkout(
    State(state): State<AppState>,
    Session(session): Session,
    Checkin(checkin): Checkin,
    jar: CookieJar,
) -> Response {
    let result = blocking(move || state.attendance.checkout(&session, &checkin)).await;

    match result {
        Ok(attendance) => (
            jar.add(removal_cookie(CHECKIN_COOKIE)),
            Envelope::success(Status::Ok, attendance),
        )
            .into_response(),
        Err(AppError::NotFound) => {
            (jar.add(removal_cookie(CHECKIN_COOKIE)), AppError::NotFound).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn history(
    State(state): State<AppState>,
    Session(session): Session,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let req: AttendanceHistoryRequest = decode(&body)?;
    req.validate()?;

    let rows = blocking(move || state.attendance.history(&session, &req)).await?;
    Ok(Envelope::success(Status::Ok, rows))
}
