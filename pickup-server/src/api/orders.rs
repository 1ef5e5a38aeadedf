//! Order Routes
//!
//! - `POST /api/orders`: public customer submission
//! - `GET /api/orders/status`: public batch status for polling clients
//! - `PATCH /api/orders/{id}`: staff status transition
//! - `DELETE /api/orders`: staff bulk purge

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};
use shared::models::{CreateOrderRequest, Order, OrderStatus};
use std::collections::BTreeMap;
use validator::Validate;

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(submit_order).delete(purge_orders))
        .route("/api/orders/status", get(batch_status))
        .route("/api/orders/{id}", patch(transition_order))
}

async fn submit_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    req.validate()
        .map_err(|e| AppError::invalid_order(e.to_string()))?;

    let items = req.items.into_iter().map(Into::into).collect();
    let order = state.scheduler().submit(req.pickup_slot, items).await?;
    Ok(ApiResponse::success(order))
}

#[derive(Debug, Deserialize)]
struct BatchStatusQuery {
    /// Comma-separated order ids
    ids: String,
}

async fn batch_status(
    State(state): State<AppState>,
    Query(query): Query<BatchStatusQuery>,
) -> Result<ApiResponse<BTreeMap<String, OrderStatus>>, AppError> {
    let ids: Vec<String> = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();

    let statuses = state.scheduler().batch_status(&ids).await?;
    Ok(ApiResponse::success(statuses))
}

#[derive(Debug, Deserialize)]
struct TransitionRequest {
    status: OrderStatus,
}

async fn transition_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    let order_id: i64 = id
        .parse()
        .map_err(|_| AppError::invalid_reference(id.clone()))?;

    let order = state.scheduler().transition(order_id, req.status).await?;
    Ok(ApiResponse::success(order))
}

#[derive(Debug, Deserialize)]
struct PurgeRequest {
    ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PurgeResponse {
    removed: u64,
}

async fn purge_orders(
    State(state): State<AppState>,
    Json(req): Json<PurgeRequest>,
) -> Result<ApiResponse<PurgeResponse>, AppError> {
    let removed = state.scheduler().purge(&req.ids).await?;
    Ok(ApiResponse::success(PurgeResponse { removed }))
}
