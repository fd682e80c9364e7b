use tracing::{error, info};

use passcode_core::tracing::init_tracing;
use passcode_otp::config::OtpConfig;
use passcode_otp::infra::db::connect;
use passcode_otp::router::build_router;
use passcode_otp::state::AppState;
use passcode_otp::store::OtpStore;

#[tokio::main]
async fn main() {
    init_tracing("passcode_otp=info,tower_http=info");

    let config = OtpConfig::from_env();

    let db = connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let store = OtpStore::init(db, config.sweep_interval())
        .await
        .expect("failed to initialize otp store");

    let state = AppState {
        store: store.clone(),
        otp_ttl: config.otp_ttl(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("otp service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    store.shutdown().await;
    info!("otp service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
