//! BORNOVAMUN'26's application backend web server.

use std::sync::Arc;

use bornovamun_backend::{
    api, config::Config, db, email::SmtpSender, sheets::GoogleSheets, store::PgCodeStore, AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    tracing::info!("connecting to database");

    let pool = db::initialize(&config.database_url).await?;

    let state = AppState {
        codes: Arc::new(PgCodeStore::new(pool)),
        sheets: Arc::new(GoogleSheets::new(&config.service_account)?),
        email: Arc::new(SmtpSender::new(&config)?),
        config: Arc::new(config),
    };

    let listener = TcpListener::bind(&state.config.address).await?;

    tracing::info!(address = %state.config.address, "listening");

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
