#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use absensi::core::hasher::Bcrypt;
use absensi::core::relay::{AttendanceRelay, DEFAULT_QUEUE, LocalBroker};
use absensi::core::token::TokenCodec;
use absensi::db::initialize::init_db;
use absensi::db::pool::DbPool;
use absensi::http::AppState;
use absensi::models::claims::SessionClaim;
use absensi::models::employee::{Account, RegisterRequest};

pub const SECRET: &str = "integration-test-secret";

pub fn abs() -> Command {
    cargo_bin_cmd!("absensi")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_absensi.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub struct TestApp {
    pub state: AppState,
    pub pool: DbPool,
    pub tokens: TokenCodec,
}

/// Fresh in-memory database with the schema applied, cheap bcrypt cost and
/// a private broker.
pub fn test_app() -> TestApp {
    let pool = DbPool::in_memory().expect("in-memory db");
    pool.with_conn(|conn| init_db(conn)).expect("schema");

    let tokens = TokenCodec::new(SECRET);
    let relay = AttendanceRelay::new(LocalBroker::new(), DEFAULT_QUEUE, Duration::from_millis(500));
    let state = AppState::new(pool.clone(), Arc::new(Bcrypt::new(4)), tokens.clone(), relay);

    TestApp {
        state,
        pool,
        tokens,
    }
}

pub fn register(app: &TestApp, name: &str, email: &str) -> Account {
    app.state
        .accounts
        .register(&RegisterRequest {
            name: name.into(),
            password: "rahasia123".into(),
            email: email.into(),
        })
        .expect("register")
}

pub fn session_of(account: &Account) -> SessionClaim {
    SessionClaim {
        id: account.id,
        email: account.email.clone(),
        name: account.name.clone(),
    }
}
