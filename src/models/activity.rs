use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::attendance::non_blank;
use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_date;

/// Row of the `activities` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: i64,                           // ⇔ activities.id
    #[serde(rename = "userID")]
    pub employee_id: i64,                  // ⇔ activities.userID
    #[serde(rename = "deskripsi")]
    pub description: String,               // ⇔ activities.deskripsi
    pub created_at: NaiveDateTime,         // ⇔ activities.created_at
    #[serde(rename = "update_at")]
    pub updated_at: Option<NaiveDateTime>, // ⇔ activities.update_at
}

/// Body of `POST /account/activity` and `PATCH /account/activity/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRequest {
    #[serde(default, rename = "deskripsi", alias = "description")]
    pub description: String,
}

impl ActivityRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::BadRequest("deskripsi is required".into()));
        }
        Ok(())
    }
}

/// Body of `GET /account/activity/riwayat`.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeRequest {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
}

impl DateRangeRequest {
    /// `from` is mandatory, `to` is optional (open towards today).
    pub fn bounds(&self) -> AppResult<(NaiveDate, Option<NaiveDate>)> {
        if self.from.trim().is_empty() {
            return Err(AppError::BadRequest("from is required".into()));
        }
        let from = parse_date(self.from.trim())?;
        let to = non_blank(&self.to).map(parse_date).transpose()?;
        if let Some(to) = to
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_accepts_both_field_names() {
        let a: ActivityRequest = serde_json::from_str(r#"{"deskripsi":"rapat"}"#).unwrap();
        let b: ActivityRequest = serde_json::from_str(r#"{"description":"rapat"}"#).unwrap();
        assert_eq!(a.description, "rapat");
        assert_eq!(b.description, "rapat");

        let empty: ActivityRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(empty.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn range_bounds_are_checked() {
        let open = DateRangeRequest {
            from: "2025-01-10".into(),
            to: None,
        };
        let (from, to) = open.bounds().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert!(to.is_none());

        let reversed = DateRangeRequest {
            from: "2025-01-10".into(),
            to: Some("2025-01-01".into()),
        };
        assert!(matches!(reversed.bounds(), Err(AppError::BadRequest(_))));

        let garbage = DateRangeRequest {
            from: "2025-01-01' OR '1'='1".into(),
            to: None,
        };
        assert!(garbage.bounds().is_err());
    }
}
