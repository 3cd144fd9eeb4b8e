use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::errors::{AppError, AppResult};

/// Storage format of every timestamp column.
pub const DB_DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local wall-clock time, truncated to whole seconds so that values survive
/// a round trip through the TEXT columns unchanged.
pub fn now() -> NaiveDateTime {
    let n = Local::now().naive_local();
    n.with_nanosecond(0).unwrap_or(n)
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| AppError::InvalidDate(s.to_string()))
}

pub fn to_db(dt: &NaiveDateTime) -> String {
    dt.format(DB_DATETIME_FMT).to_string()
}

pub fn date_to_db(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub fn from_db(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DB_DATETIME_FMT)
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}
