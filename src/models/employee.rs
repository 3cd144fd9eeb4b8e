use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Row of the `employees` table. Holds the password hash, so it is never
/// serialized; callers get an [`Account`] instead.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i64,                           // ⇔ employees.id
    pub name: String,                      // ⇔ employees.name
    pub email: String,                     // ⇔ employees.email (UNIQUE)
    pub password_hash: String,             // ⇔ employees.password
    pub created_at: NaiveDateTime,         // ⇔ employees.created_at
    pub updated_at: Option<NaiveDateTime>, // ⇔ employees.update_at
}

/// Public view of an employee.
///
/// `password` is kept on the wire for compatibility with existing clients
/// and is always empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub created_at: NaiveDateTime,
    #[serde(rename = "update_at")]
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Employee> for Account {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            password: String::new(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password is required".into()));
        }
        validate_email(&self.email)
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password is required".into()));
        }
        validate_email(&self.email)
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("invalid email: '{}'", email)))
    }
}
