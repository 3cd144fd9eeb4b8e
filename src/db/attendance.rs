use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{OptionalExtension, Row, params};

use crate::db::employees::conversion_error;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::Attendance;
use crate::models::table::Table;
use crate::utils::date;

/// Attendance store (`absensi` table).
#[derive(Clone)]
pub struct AttendanceStore {
    pool: DbPool,
    table: Table,
}

pub(crate) fn parse_ts(row: &Row, column: &str) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(column)?;
    date::from_db(&s).map_err(|e| conversion_error(e, column))
}

pub(crate) fn parse_opt_ts(row: &Row, column: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    row.get::<_, Option<String>>(column)?
        .map(|s| date::from_db(&s))
        .transpose()
        .map_err(|e| conversion_error(e, column))
}

pub fn map_attendance(row: &Row) -> rusqlite::Result<Attendance> {
    Ok(Attendance {
        id: row.get("id")?,
        employee_id: row.get("userID")?,
        name: row.get("name")?,
        checkin: parse_ts(row, "checkin")?,
        checkout: parse_opt_ts(row, "checkout")?,
    })
}

impl AttendanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            table: Table::Absensi,
        }
    }

    /// Persist a check-in; returns the generated id.
    pub fn create(&self, rec: &Attendance) -> AppResult<i64> {
        let sql = format!(
            "INSERT INTO {} (userID, name, checkin) VALUES (?1, ?2, ?3)",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.execute(
                &sql,
                params![rec.employee_id, rec.name, date::to_db(&rec.checkin)],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_by_id(&self, id: i64) -> AppResult<Attendance> {
        let sql = format!(
            "SELECT id, userID, name, checkin, checkout FROM {} WHERE id = ?1",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.query_row(&sql, [id], map_attendance)
                .optional()?
                .ok_or(AppError::NotFound)
        })
    }

    /// Close an open record owned by `employee_id`.
    ///
    /// Zero affected rows (unknown id, other owner, already closed) is
    /// reported as NotFound.
    pub fn checkout(&self, id: i64, employee_id: i64, at: &NaiveDateTime) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET checkout = ?1
             WHERE id = ?2 AND userID = ?3 AND checkout IS NULL",
            self.table.to_db_str()
        );

        let affected = self.pool.with_conn(|conn| {
            Ok(conn.execute(&sql, params![date::to_db(at), id, employee_id])?)
        })?;

        if affected < 1 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Records of one employee whose check-in day falls in `[from, to]`.
    /// A missing `to` means today; a missing `from` means no lower bound.
    pub fn history(
        &self,
        employee_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Attendance>> {
        let to = to.unwrap_or_else(date::today);
        let from = from.map(|d| date::date_to_db(&d));

        let sql = format!(
            "SELECT id, userID, name, checkin, checkout FROM {}
             WHERE userID = ?1
               AND (?2 IS NULL OR date(checkin) >= ?2)
               AND date(checkin) <= ?3
             ORDER BY checkin ASC, id ASC",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![employee_id, from, date::date_to_db(&to)], map_attendance)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
