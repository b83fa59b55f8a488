use std::net::SocketAddr;

mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod products;
mod state;
mod users;

#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inventory_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect_with_backoff(&config.db).await?;
    db::run_migrations(&pool).await;

    let app = app::build_app(AppState::from_pool(pool));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    app::serve(app, addr).await
}
