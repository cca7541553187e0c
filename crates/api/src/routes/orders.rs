//! Order intake endpoint and shared application state.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use event_bus::EventBus;
use inventory::ProductCatalog;
use order_store::{OrderRecord, OrderStore};
use saga::{CreateOrderRequest, IntakeService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<B, S, C> {
    pub intake: IntakeService<B, S>,
    pub catalog: C,
    pub bus: B,
    pub store: S,
}

/// POST /orders — accept an order and start its lifecycle.
///
/// Responds 201 with the stored `PENDING` record. Acceptance means the
/// record is written; the creation event publish may still have failed
/// behind the scenes.
#[tracing::instrument(skip_all, fields(customer = %req.customer_name))]
pub async fn create<B, S, C>(
    State(state): State<Arc<AppState<B, S, C>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderRecord>), ApiError>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let record = state.intake.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
