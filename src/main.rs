// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campus_identity_server::{
    api::router,
    auth::{password::hash_password, Role},
    config::{AdminSeed, AppConfig, LogFormat},
    state::AppState,
    storage::{CredentialStore, InMemoryStore, RefreshTokenSweeper, StoreError, UserRecord},
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load configuration");
    init_tracing(config.log_format);
    info!(?config, "Loaded configuration");

    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; local logins and local tokens will be rejected");
    }

    let store = Arc::new(InMemoryStore::new());
    if let Some(seed) = &config.admin_seed {
        seed_admin(store.as_ref(), seed).await;
    }

    let state = AppState::from_config(&config, store.clone()).expect("failed to build campus client");

    // Warm the campus credential without holding up startup
    let credentials = state.credentials().clone();
    tokio::spawn(async move { credentials.prewarm().await });

    let shutdown = CancellationToken::new();
    let sweeper = RefreshTokenSweeper::new(store).with_interval(config.refresh_sweep_interval);
    let sweeper_task = tokio::spawn(sweeper.run(shutdown.clone()));

    let app = router(state, &config.allowed_origins);
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .expect("Failed to parse bind address");

    match &config.tls {
        Some(tls) => {
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .expect("Failed to load TLS certificate and key");

            let handle: axum_server::Handle<SocketAddr> = axum_server::Handle::new();
            tokio::spawn(graceful_tls_shutdown(handle.clone(), shutdown.clone()));

            info!(%addr, "Campus identity server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .expect("Failed to bind listener");

            info!(%addr, "Campus identity server listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
                .await
                .expect("HTTP server failed");
        }
    }

    shutdown.cancel();
    if let Err(e) = sweeper_task.await {
        error!(error = %e, "Refresh token sweeper task failed");
    }
    info!("Server stopped");
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn seed_admin(store: &dyn CredentialStore, seed: &AdminSeed) {
    let password_hash = match hash_password(&seed.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash seed admin password");
            return;
        }
    };

    let admin = UserRecord {
        id: 0,
        login_id: String::new(),
        first_name: "Administrator".to_string(),
        middle_name: String::new(),
        last_name: String::new(),
        email: seed.email.clone(),
        password_hash,
        role: Role::Admin,
        active: true,
    };

    match store.insert_user(admin).await {
        Ok(user) => info!(user_id = user.id, email = %user.email, "Seeded admin account"),
        Err(StoreError::AlreadyExists(_)) => info!(email = %seed.email, "Admin account already present"),
        Err(e) => error!(error = %e, "Failed to seed admin account"),
    }
}

/// Resolves on Ctrl+C or SIGTERM, cancelling `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
        () = shutdown.cancelled() => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}

async fn graceful_tls_shutdown(
    handle: axum_server::Handle<SocketAddr>,
    shutdown: CancellationToken,
) {
    shutdown_signal(shutdown).await;
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
