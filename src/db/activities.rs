use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{OptionalExtension, Row, params};

use crate::db::attendance::{parse_opt_ts, parse_ts};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::activity::Activity;
use crate::models::table::Table;
use crate::utils::date;

/// Activity-log store (`activities` table).
#[derive(Clone)]
pub struct ActivityStore {
    pool: DbPool,
    table: Table,
}

pub fn map_activity(row: &Row) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        employee_id: row.get("userID")?,
        description: row.get("deskripsi")?,
        created_at: parse_ts(row, "created_at")?,
        updated_at: parse_opt_ts(row, "update_at")?,
    })
}

impl ActivityStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            table: Table::Activities,
        }
    }

    pub fn create(
        &self,
        employee_id: i64,
        description: &str,
        created_at: &NaiveDateTime,
    ) -> AppResult<i64> {
        let sql = format!(
            "INSERT INTO {} (userID, deskripsi, created_at) VALUES (?1, ?2, ?3)",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.execute(&sql, params![employee_id, description, date::to_db(created_at)])?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_by_id(&self, id: i64) -> AppResult<Activity> {
        let sql = format!(
            "SELECT id, userID, deskripsi, created_at, update_at FROM {} WHERE id = ?1",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.query_row(&sql, [id], map_activity)
                .optional()?
                .ok_or(AppError::NotFound)
        })
    }

    pub fn update(&self, id: i64, description: &str, updated_at: &NaiveDateTime) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET deskripsi = ?1, update_at = ?2 WHERE id = ?3",
            self.table.to_db_str()
        );

        let affected = self.pool.with_conn(|conn| {
            Ok(conn.execute(&sql, params![description, date::to_db(updated_at), id])?)
        })?;

        if affected < 1 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table.to_db_str());

        let affected = self
            .pool
            .with_conn(|conn| Ok(conn.execute(&sql, [id])?))?;

        if affected < 1 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Activities of one employee created within `[from, to]` (inclusive,
    /// by day), oldest first. A missing `to` means today.
    pub fn history(
        &self,
        employee_id: i64,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Activity>> {
        let to = to.unwrap_or_else(date::today);

        let sql = format!(
            "SELECT id, userID, deskripsi, created_at, update_at FROM {}
             WHERE userID = ?1 AND date(created_at) BETWEEN ?2 AND ?3
             ORDER BY created_at ASC, id ASC",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![employee_id, date::date_to_db(&from), date::date_to_db(&to)],
                map_activity,
            )?;

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
