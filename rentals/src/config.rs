//! Configuration management for the rentals service.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// `PostgreSQL` property store; in-memory when absent
    pub database: Option<DatabaseConfig>,
    /// Reservation lifecycle tunables
    pub reservations: ReservationConfig,
    /// Owner notice configuration
    pub notifications: NotificationConfig,
    /// Register demo owner, guest, property and tokens at startup
    pub seed_demo_data: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter (trace, debug, info, warn, error, or a full directive)
    pub log_level: String,
    /// Metrics server host (for Prometheus scraping)
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

/// Reservation lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Days before the start date when owner cancellation closes
    pub cancellation_notice_days: u32,
    /// How long a request waits for its command outcome, in milliseconds
    pub command_timeout_ms: u64,
}

/// Owner notice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Sender address on owner notices
    pub from_address: String,
    /// Public base URL used for links in notices
    pub base_url: String,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|s| s.trim().parse().ok())
        }
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            server: ServerConfig {
                host: string("HOST", "0.0.0.0"),
                port: parse(lookup("PORT")).unwrap_or(8080),
                log_level: string("RUST_LOG", "info,rentals=debug,sqlx=warn"),
                metrics_host: string("METRICS_HOST", "0.0.0.0"),
                metrics_port: parse(lookup("METRICS_PORT")).unwrap_or(9090),
                shutdown_timeout: parse(lookup("SHUTDOWN_TIMEOUT")).unwrap_or(30),
            },
            database: lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| DatabaseConfig {
                    url,
                    max_connections: parse(lookup("DATABASE_MAX_CONNECTIONS")).unwrap_or(10),
                    connect_timeout: parse(lookup("DATABASE_CONNECT_TIMEOUT")).unwrap_or(30),
                }),
            reservations: ReservationConfig {
                cancellation_notice_days: parse(lookup("CANCELLATION_NOTICE_DAYS")).unwrap_or(0),
                command_timeout_ms: parse(lookup("COMMAND_TIMEOUT_MS")).unwrap_or(5000),
            },
            notifications: NotificationConfig {
                from_address: string("NOTIFY_FROM_ADDRESS", "reservas@staybook.local"),
                base_url: string("APP_BASE_URL", "http://localhost:8080"),
            },
            seed_demo_data: parse(lookup("SEED_DEMO_DATA")).unwrap_or(false),
        }
    }

    /// `host:port` the HTTP server binds to
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// `host:port` the metrics exporter binds to
    #[must_use]
    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.server.metrics_host, self.server.metrics_port)
    }

    /// Graceful shutdown budget
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    /// Command outcome timeout
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.reservations.command_timeout_ms)
    }
}
