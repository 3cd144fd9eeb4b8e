use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::table::Table;
use crate::utils::date;
use rusqlite::{Connection, params};
use tracing::warn;

/// Write an internal audit line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = date::to_db(&date::now());

    let sql = format!(
        "INSERT INTO {} (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
        Table::Log.to_db_str()
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Like [`ttlog`] but never fails the caller: the audit trail is best effort.
pub fn audit(pool: &DbPool, operation: &str, target: &str, message: &str) {
    if let Err(e) = pool.with_conn(|conn| ttlog(conn, operation, target, message)) {
        warn!(operation, target, error = %e, "failed to write audit log");
    }
}

#[derive(Debug, Clone)]
pub struct LogRow {
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogRow>> {
    let sql = format!(
        "SELECT date, operation, target, message FROM {} ORDER BY id DESC",
        Table::Log.to_db_str()
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| {
        Ok(LogRow {
            date: row.get(0)?,
            operation: row.get(1)?,
            target: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            message: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    Ok(out)
}
