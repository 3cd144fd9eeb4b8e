//! HTTP surface: router, shared state and server loop.

pub mod handlers;
pub mod response;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::routing::{get, patch, post};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::core::account::AccountLogic;
use crate::core::activity::ActivityLogic;
use crate::core::attendance::AttendanceLogic;
use crate::core::hasher::{Bcrypt, PasswordHasher};
use crate::core::relay::{AttendanceRelay, LocalBroker};
use crate::core::token::TokenCodec;
use crate::db::activities::ActivityStore;
use crate::db::attendance::AttendanceStore;
use crate::db::employees::EmployeeStore;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

use handlers::{account, activity, attendance};

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountLogic,
    pub attendance: AttendanceLogic,
    pub activities: ActivityLogic,
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenCodec,
        relay: AttendanceRelay,
    ) -> Self {
        Self {
            accounts: AccountLogic::new(EmployeeStore::new(pool.clone()), hasher, tokens.clone()),
            attendance: AttendanceLogic::new(
                AttendanceStore::new(pool.clone()),
                relay,
                tokens.clone(),
            ),
            activities: ActivityLogic::new(ActivityStore::new(pool)),
            tokens,
        }
    }

    /// Wire the state from configuration. The broker is created by the
    /// caller once per process.
    pub fn from_config(pool: DbPool, cfg: &Config, broker: LocalBroker) -> Self {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Bcrypt::new(cfg.hash_cost));
        let tokens = TokenCodec::new(&cfg.signing_secret());
        let relay = AttendanceRelay::new(broker, &cfg.queue_name, cfg.relay_timeout());
        Self::new(pool, hasher, tokens, relay)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/logout", get(account::logout))
        .route("/account/checkin", post(attendance::checkin))
        .route("/account/checkout", get(attendance::checkout))
        .route("/account/riwayat", get(attendance::history))
        .route("/account/activity", post(activity::add))
        .route("/account/activity/riwayat", get(activity::history))
        .route(
            "/account/activity/:id",
            patch(activity::update).delete(activity::delete),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Decode a JSON body; anything that does not parse is 422.
pub fn decode<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::UnprocessableEntity(e.to_string()))
}

/// Run a synchronous (database) closure on the blocking pool.
pub async fn blocking<F, T>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Other(format!("blocking task failed: {}", e)))?
}

pub async fn serve(state: AppState, port: u16) -> AppResult<()> {
    let app = router(state);

    let address = format!("0.0.0.0:{}", port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
