//! Schema migrations.
//!
//! Every migration has a version string; once applied it is recorded in the
//! `log` table (`operation = 'migration_applied'`) and never runs again.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::errors::{AppError, AppResult};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250101_0001_create_employees",
        description: "Created employees table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            password    TEXT NOT NULL,
            email       TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            update_at   TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_email ON employees(email);
        "#,
    },
    Migration {
        version: "20250101_0002_create_absensi",
        description: "Created absensi table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS absensi (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            userID    INTEGER NOT NULL REFERENCES employees(id),
            name      TEXT NOT NULL,
            checkin   TEXT NOT NULL,
            checkout  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_absensi_user_checkin ON absensi(userID, checkin);
        "#,
    },
    Migration {
        version: "20250101_0003_create_activities",
        description: "Created activities table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS activities (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            userID      INTEGER NOT NULL REFERENCES employees(id),
            deskripsi   TEXT NOT NULL CHECK(length(deskripsi) > 0),
            created_at  TEXT NOT NULL,
            update_at   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_activities_user_created ON activities(userID, created_at);
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now', 'localtime'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;

    info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
/// Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied.push(m.version);
    }

    Ok(applied)
}

/// Versions known to this build that are not yet recorded in `log`.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        let first = run_pending_migrations(&conn).unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());

        let second = run_pending_migrations(&conn).unwrap();
        assert!(second.is_empty());
        assert!(pending_migrations(&conn).unwrap().is_empty());
    }
}
