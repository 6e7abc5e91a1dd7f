//! Metrics collection and exposition.
//!
//! # Metrics
//! - `swap_transactions_submitted_total` (counter): transactions sent, by step
//! - `swap_receipt_outcomes_total` (counter): terminal receipt outcomes
//! - `swap_step_duration_seconds` (histogram): wall time per pipeline step
//!
//! Recording is a no-op until an exporter is installed.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::blockchain::types::TransactionOutcome;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install metrics exporter on {}: {}", addr, e))?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_transaction_submitted(step: &'static str) {
    counter!("swap_transactions_submitted_total", "step" => step).increment(1);
}

pub fn record_receipt_outcome(outcome: TransactionOutcome) {
    counter!("swap_receipt_outcomes_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_step_duration(step: &'static str, seconds: f64) {
    histogram!("swap_step_duration_seconds", "step" => step).record(seconds);
}
