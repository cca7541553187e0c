//! Catalog administration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::ProductId;
use event_bus::EventBus;
use inventory::{Product, ProductCatalog};
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use super::orders::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct QuantityQuery {
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct QuantityResponse {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /products — list the full catalog.
pub async fn list<B, S, C>(State(state): State<Arc<AppState<B, S, C>>>) -> Json<Vec<Product>>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    Json(state.catalog.list().await)
}

/// GET /products/{id} — fetch one product.
pub async fn get<B, S, C>(
    State(state): State<Arc<AppState<B, S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let product_id = ProductId::new(&id);
    match state.catalog.find(&product_id).await {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::NotFound(format!("product {id} not found"))),
    }
}

/// POST /products — insert or replace a product.
#[tracing::instrument(skip_all, fields(product_id = %product.product_id))]
pub async fn upsert<B, S, C>(
    State(state): State<Arc<AppState<B, S, C>>>,
    Json(product): Json<Product>,
) -> Json<Product>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    state.catalog.upsert(product.clone()).await;
    tracing::info!(product_id = %product.product_id, "product upserted");
    Json(product)
}

/// PUT /products/{id}/quantity?quantity=n — set available stock.
///
/// Always 200; an unknown product is a logged no-op in the catalog.
pub async fn set_quantity<B, S, C>(
    State(state): State<Arc<AppState<B, S, C>>>,
    Path(id): Path<String>,
    Query(query): Query<QuantityQuery>,
) -> Json<QuantityResponse>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let product_id = ProductId::new(&id);
    state
        .catalog
        .set_quantity(&product_id, query.quantity)
        .await;
    Json(QuantityResponse {
        product_id,
        quantity: query.quantity,
    })
}

/// DELETE /products/{id} — remove a product.
pub async fn remove<B, S, C>(
    State(state): State<Arc<AppState<B, S, C>>>,
    Path(id): Path<String>,
) -> Json<DeleteResponse>
where
    B: EventBus + 'static,
    S: OrderStore + 'static,
    C: ProductCatalog + 'static,
{
    let deleted = state.catalog.remove(&ProductId::new(&id)).await;
    Json(DeleteResponse { deleted })
}
