use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Open (or create) the database at `path` and bring its schema up to date.
pub fn open_and_init(path: &str) -> AppResult<DbPool> {
    let pool = DbPool::new(path)?;
    pool.with_conn(|conn| init_db(conn))?;
    Ok(pool)
}
