//! Prometheus metrics endpoint and the stock counters it exposes.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use inventory::{ChangeType, InventoryError, Product};
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}

/// Counts applied and rejected stock adjustments.
pub fn record_adjustment(change_type: ChangeType, result: &Result<Product, InventoryError>) {
    match result {
        Ok(_) => {
            metrics::counter!("stock_adjustments_total", "change_type" => change_type.as_str())
                .increment(1);
        }
        Err(err) => {
            let reason = match err {
                InventoryError::InvalidArgument(_) => "invalid_argument",
                InventoryError::NotFound(_) => "not_found",
                InventoryError::InsufficientStock { .. } => "insufficient_stock",
                InventoryError::Storage(_) => "storage",
            };
            metrics::counter!(
                "stock_adjustments_rejected_total",
                "change_type" => change_type.as_str(),
                "reason" => reason
            )
            .increment(1);
        }
    }
}
