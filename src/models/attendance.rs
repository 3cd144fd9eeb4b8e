use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_date;

/// Row of the `absensi` table: one check-in, closed by a single check-out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attendance {
    pub id: i64,
    #[serde(rename = "userID")]
    pub employee_id: i64,
    pub name: String,
    pub checkin: NaiveDateTime,
    pub checkout: Option<NaiveDateTime>,
}

impl Attendance {
    /// A check-in that has not been stored yet (`id == 0`).
    pub fn pending(employee_id: i64, name: &str, checkin: NaiveDateTime) -> Self {
        Self {
            id: 0,
            employee_id,
            name: name.to_string(),
            checkin,
            checkout: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.checkout.is_none()
    }
}

/// Body of `GET /account/riwayat`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceHistoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl AttendanceHistoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        Ok(())
    }

    /// Parsed `(from, to)` bounds; either may be absent, but a given `to`
    /// may not precede a given `from`.
    pub fn bounds(&self) -> AppResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        let from = non_blank(&self.from).map(parse_date).transpose()?;
        let to = non_blank(&self.to).map(parse_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to)
            && to < from
        {
            return Err(AppError::BadRequest(format!(
                "invalid range: {} is after {}",
                from, to
            )));
        }
        Ok((from, to))
    }
}

pub(crate) fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
