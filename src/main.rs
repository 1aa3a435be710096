//! rosterd - student-records API server
//!
//! Initializes configuration, logging, and the SQLite-backed stores, then
//! serves the JWT-protected REST API.

use anyhow::{Context, Result};
use roster_backend::{
    auth::{AuthState, JwtHandler, UserStore},
    config::{load_env, Config},
    server::build_router,
    students::{StudentState, StudentStore},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = Config::from_env();

    let user_store = Arc::new(UserStore::new(&config.database_path)?);
    let student_store = Arc::new(StudentStore::new(&config.database_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    info!("Stores initialized at: {}", config.database_path);

    let auth_state = AuthState::new(user_store, jwt_handler);
    let student_state = StudentState::new(student_store);

    let app = build_router(auth_state, student_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
