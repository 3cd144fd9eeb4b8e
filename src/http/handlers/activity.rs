use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::errors::{AppError, AppResult};
use crate::http::response::{Envelope, Status};
use crate::http::session::{Checkin, Session};
use crate::http::{AppState, blocking, decode};
use crate::models::activity::{ActivityRequest, DateRangeRequest};

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
}

pub async fn add(
    State(state): State<AppState>,
    Checkin(checkin): Checkin,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let req: ActivityRequest = decode(&body)?;
    req.validate()?;

    let activity = blocking(move || state.activities.add(checkin.id, &req)).await?;
    Ok(Envelope::success(Status::Ok, activity))
}

pub async fn update(
    State(state): State<AppState>,
    Checkin(checkin): Checkin,
    Path(raw): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw)?;
    let req: ActivityRequest = decode(&body)?;
    req.validate()?;

    let activity = blocking(move || state.activities.update(id, checkin.id, &req)).await?;
    Ok(Envelope::success(Status::Ok, activity))
}

pub async fn delete(
    State(state): State<AppState>,
    Checkin(checkin): Checkin,
    Path(raw): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw)?;

    blocking(move || state.activities.delete(id, checkin.id)).await?;
    Ok(Envelope::success(Status::Ok, format!("activity {} deleted", id)))
}

pub async fn history(
    State(state): State<AppState>,
    Session(session): Session,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let req: DateRangeRequest = decode(&body)?;

    let rows = blocking(move || state.activities.history(session.id, &req)).await?;
    Ok(Envelope::success(Status::Ok, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_id_must_be_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id(""), Err(AppError::BadRequest(_))));
    }
}
