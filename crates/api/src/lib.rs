//! HTTP boundary for the order lifecycle system.
//!
//! Exposes order intake and catalog administration endpoints, with
//! structured logging (tracing) and Prometheus metrics. The binary
//! wires intake, validation and finalization over the in-memory bus
//! and store.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post, put};
use event_bus::{EventBus, InMemoryEventBus};
use inventory::{InMemoryProductCatalog, ProductCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, OrderStore};
use saga::{
    FINALIZATION_CONSUMER_GROUP, FinalizationWorker, INVENTORY_CONSUMER_GROUP, IntakeService,
    ValidationWorker,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<B, S, C>(state: Arc<AppState<B, S, C>>, metrics_handle: PrometheusHandle) -> Router
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<B, S, C>))
        .route("/products", get(routes::products::list::<B, S, C>))
        .route("/products", post(routes::products::upsert::<B, S, C>))
        .route("/products/{id}", get(routes::products::get::<B, S, C>))
        .route(
            "/products/{id}",
            delete(routes::products::remove::<B, S, C>),
        )
        .route(
            "/products/{id}/quantity",
            put(routes::products::set_quantity::<B, S, C>),
        )
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

/// Creates the default application state: sample catalog, in-memory
/// bus and store, with both lifecycle workers subscribed.
pub async fn create_default_state(
    config: &Config,
) -> Arc<AppState<InMemoryEventBus, InMemoryOrderStore, InMemoryProductCatalog>> {
    let bus = InMemoryEventBus::new();
    let store = InMemoryOrderStore::with_prefix(&config.order_key_prefix);
    let catalog = InMemoryProductCatalog::with_sample_data();
    let topics = config.topics();

    let validation = ValidationWorker::new(catalog.clone(), bus.clone(), topics.clone());
    bus.subscribe(
        &topics.order_created,
        INVENTORY_CONSUMER_GROUP,
        Arc::new(validation),
    )
    .await;

    let finalization = FinalizationWorker::new(store.clone());
    bus.subscribe(
        &topics.inventory_check_result,
        FINALIZATION_CONSUMER_GROUP,
        Arc::new(finalization),
    )
    .await;

    let intake = IntakeService::new(
        bus.clone(),
        store.clone(),
        topics,
        Duration::from_secs(config.pending_ttl_secs),
    );

    Arc::new(AppState {
        intake,
        catalog,
        bus,
        store,
    })
}
