use std::net::SocketAddr;

use axum::{Router, routing::get};
use tracing::{error, info};

mod assets;
mod config;
mod couchdb;
mod error;
mod jwks;
mod key;
mod middleware;
mod status;
mod sync;
mod telemetry;
#[cfg(test)]
mod testkeys;

const PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    let settings = match config::load(config::CONFIG_PATH) {
        Ok(settings) => settings,
        Err(e) => {
            // telemetry is not up yet
            eprintln!("keywarden cannot start: {e}");
            std::process::exit(1);
        }
    };

    let _otel = telemetry::init(&settings.telemetry);
    info!("CouchDB IdP key updater up and away");

    let status_store = status::StatusStore::new();
    tokio::spawn(sync::run_scheduler(settings, status_store.clone()));

    let app = Router::new()
        .route("/status", get(status::status))
        .fallback(get(assets::serve))
        .layer(middleware::CspLayer::new())
        .with_state(status_store);

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, "cannot listen on {}", addr);
            std::process::exit(1);
        }
    };
    info!("server up and running on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server terminated");
        std::process::exit(1);
    }
    info!("gone with the wind");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for the shutdown signal");
    }
}
