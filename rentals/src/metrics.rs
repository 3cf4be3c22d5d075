//! Business metrics for reservations.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `rentals_reservations_total{status}` - Lifecycle transitions by resulting status
//! - `rentals_lifecycle_denied_total{reason}` - Refused owner actions by reason
//! - `rentals_notifications_total{outcome}` - Owner notices by delivery outcome
//! - `rentals_save_failures_total` - Changes rolled back because the save failed
//!
//! The store runtime adds its own `store.*` series.

use crate::lifecycle::DenialReason;
use crate::types::ReservationStatus;
use metrics::describe_counter;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to configure the exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install the exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus exporter, serving `/metrics` on `addr`.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built or a recorder is
/// already installed.
pub fn install_exporter(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_business_metrics();
    tracing::info!(%addr, "Metrics available at http://{addr}/metrics");
    Ok(())
}

/// Register all business metric descriptions.
pub fn register_business_metrics() {
    describe_counter!(
        "rentals_reservations_total",
        "Reservation lifecycle transitions by resulting status (pending, accepted, canceled)"
    );
    describe_counter!(
        "rentals_lifecycle_denied_total",
        "Owner actions refused by the lifecycle, by reason"
    );
    describe_counter!(
        "rentals_notifications_total",
        "Owner notices by delivery outcome (sent, failed)"
    );
    describe_counter!(
        "rentals_save_failures_total",
        "Reservation changes rolled back because they could not be saved"
    );
}

/// Record a reservation entering `status`.
pub fn record_reservation(status: ReservationStatus) {
    metrics::counter!("rentals_reservations_total", "status" => status.as_str()).increment(1);
}

/// Record a refused lifecycle operation.
pub fn record_denied(reason: DenialReason) {
    metrics::counter!("rentals_lifecycle_denied_total", "reason" => reason.as_str()).increment(1);
    tracing::debug!(reason = reason.as_str(), "Recorded lifecycle_denied metric");
}

/// Record an owner notice outcome (`sent` or `failed`).
pub fn record_notification(outcome: &'static str) {
    metrics::counter!("rentals_notifications_total", "outcome" => outcome).increment(1);
}

/// Record a change that was rolled back because it could not be saved.
pub fn record_save_failure() {
    metrics::counter!("rentals_save_failures_total").increment(1);
}
