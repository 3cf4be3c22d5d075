//! Rentals HTTP server.
//!
//! Property reservations with an owner-driven lifecycle, served over JSON.

use anyhow::Context;
use rentals::{
    bootstrap,
    config::Config,
    identity::InMemoryIdentityProvider,
    notifications::ConsoleNotifier,
    properties::{InMemoryPropertyStore, PostgresPropertyStore, PropertyStore},
    repository::{
        InMemoryReservationRepository, PostgresReservationRepository, ReservationRepository,
    },
    server::{AppState, build_router},
    service::{ReservationService, ServiceSettings},
    CancellationPolicy,
};
use staybook_core::environment::{Clock, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| "info,rentals=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rentals HTTP Server");
    info!(
        postgres = config.database.is_some(),
        cancellation_notice_days = config.reservations.cancellation_notice_days,
        "Configuration loaded"
    );

    // Metrics exporter
    let metrics_addr: SocketAddr = config
        .metrics_address()
        .parse()
        .context("Invalid metrics address")?;
    if let Err(e) = rentals::metrics::install_exporter(metrics_addr) {
        warn!(error = %e, "Metrics exporter disabled");
    }

    // Property store and reservation repository share one database
    let (properties, repository): (Arc<dyn PropertyStore>, Arc<dyn ReservationRepository>) =
        match &config.database {
            Some(database) => {
                info!("Connecting to database...");
                let store = PostgresPropertyStore::connect(
                    &database.url,
                    database.max_connections,
                    Duration::from_secs(database.connect_timeout),
                )
                .await
                .context("Failed to connect to database")?;
                store.migrate().await.context("Failed to run migrations")?;
                info!("Database ready");
                let repository = PostgresReservationRepository::new(store.pool().clone());
                (Arc::new(store), Arc::new(repository))
            },
            None => {
                info!("DATABASE_URL not set, using in-memory storage");
                (
                    Arc::new(InMemoryPropertyStore::new()),
                    Arc::new(InMemoryReservationRepository::new()),
                )
            },
        };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = Arc::new(ConsoleNotifier::new(
        config.notifications.from_address.clone(),
        config.notifications.base_url.clone(),
    ));
    let identity = Arc::new(InMemoryIdentityProvider::new());

    if config.seed_demo_data {
        bootstrap::seed_demo_data(properties.as_ref(), &identity, clock.now())
            .await
            .context("Failed to seed demo data")?;
    }

    let service = Arc::new(
        ReservationService::start(
            properties,
            repository,
            notifier,
            clock,
            ServiceSettings {
                policy: CancellationPolicy::new(config.reservations.cancellation_notice_days),
                command_timeout: config.command_timeout(),
            },
        )
        .await
        .context("Failed to load saved reservations")?,
    );

    let state = AppState::new(Arc::clone(&service), identity);
    let app = build_router(state);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let in-flight owner notices finish
    if let Err(e) = service.shutdown(config.shutdown_timeout()).await {
        error!(error = %e, "Store did not shut down cleanly");
    }

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
