// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fil_wallet_gateway::{
    api::router,
    blockchain::FilecoinClient,
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{TransactionRepository, TxDatabase},
};

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::from_env());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = TxDatabase::open(&config.database_path)?;
    let store = Arc::new(TransactionRepository::new(Arc::new(db)));
    let ledger = Arc::new(FilecoinClient::new(
        config.network.clone(),
        config.rpc_url.clone(),
        config.ifil_address,
    ));

    tracing::info!(
        network = %ledger.network().name,
        chain_id = ledger.network().chain_id,
        rpc_url = %config.rpc_url,
        ifil = %config.ifil_address,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let state = AppState::new(ledger, store, config.ledger_timeout);
    let app = build_app(state, config.request_timeout);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "FIL wallet gateway listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wrap the API router with request-wide middleware.
#[allow(deprecated)]
fn build_app(state: AppState, request_timeout: Duration) -> Router {
    router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
