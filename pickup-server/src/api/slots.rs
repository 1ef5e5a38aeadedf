//! Slot Aggregation Routes
//!
//! Read path for customers picking a slot and for staff dashboards. Counts
//! are a live snapshot; clients re-fetch rather than cache.

use axum::{Router, extract::State, routing::get};
use shared::error::{ApiResponse, AppError};
use shared::models::TimeSlot;
use shared::util::now_millis;

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/slots", get(list_slots))
}

async fn list_slots(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<TimeSlot>>, AppError> {
    let slots = state.aggregator().aggregate(now_millis()).await?;
    Ok(ApiResponse::success(slots))
}
