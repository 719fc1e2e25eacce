//! HTTP API server with observability for the inventory service.
//!
//! Provides REST endpoints for the product catalog, stock adjustments and
//! stock history, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use inventory::{InventoryQueries, ProductRepository, StockService};
use inventory_store::InventoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::products::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: InventoryStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::products;

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/products",
            get(products::list::<S>).post(products::create::<S>),
        )
        .route("/api/products/low-stock", get(products::low_stock::<S>))
        .route(
            "/api/products/{id}",
            get(products::get::<S>)
                .put(products::update::<S>)
                .delete(products::delete::<S>),
        )
        .route(
            "/api/products/{id}/increase",
            post(products::increase::<S>),
        )
        .route(
            "/api/products/{id}/decrease",
            post(products::decrease::<S>),
        )
        .route("/api/products/{id}/history", get(products::history::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the repository, stock service and queries to one shared store.
pub fn create_default_state<S: InventoryStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        products: ProductRepository::new(store.clone()),
        stock: StockService::new(store.clone()),
        queries: InventoryQueries::new(store),
    })
}
