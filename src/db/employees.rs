use rusqlite::{ErrorCode, OptionalExtension, Row, params};

use crate::db::attendance::{parse_opt_ts, parse_ts};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::table::Table;
use crate::utils::date;

/// Accounts store (`employees` table).
#[derive(Clone)]
pub struct EmployeeStore {
    pool: DbPool,
    table: Table,
}

pub fn map_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password")?,
        created_at: parse_ts(row, "created_at")?,
        updated_at: parse_opt_ts(row, "update_at")?,
    })
}

pub(crate) fn conversion_error(e: AppError, column: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Other(format!("column {}: {}", column, e))),
    )
}

fn conflict_or_db(e: rusqlite::Error) -> AppError {
    match e {
        rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation => {
            AppError::Conflicted
        }
        other => AppError::Db(other),
    }
}

impl EmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            table: Table::Employees,
        }
    }

    /// Insert a new employee; returns the generated id.
    ///
    /// A second row with the same email trips the UNIQUE index and is
    /// reported as Conflicted, even when it raced past `email_exists`.
    pub fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<i64> {
        let sql = format!(
            "INSERT INTO {} (name, password, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            self.table.to_db_str()
        );
        let now = date::to_db(&date::now());

        self.pool.with_conn(|conn| {
            conn.execute(&sql, params![name, password_hash, email, now])
                .map_err(conflict_or_db)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_by_email(&self, email: &str) -> AppResult<Employee> {
        let sql = format!(
            "SELECT id, name, password, email, created_at, update_at FROM {} WHERE email = ?1",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.query_row(&sql, [email], map_employee)
                .optional()?
                .ok_or(AppError::NotFound)
        })
    }

    pub fn find_by_id(&self, id: i64) -> AppResult<Employee> {
        let sql = format!(
            "SELECT id, name, password, email, created_at, update_at FROM {} WHERE id = ?1",
            self.table.to_db_str()
        );

        self.pool.with_conn(|conn| {
            conn.query_row(&sql, [id], map_employee)
                .optional()?
                .ok_or(AppError::NotFound)
        })
    }

    pub fn email_exists(&self, email: &str) -> AppResult<bool> {
        match self.find_by_email(email) {
            Ok(_) => Ok(true),
            Err(AppError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
