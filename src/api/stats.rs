//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Statistics response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Reservation counts by status
    pub reservations: ReservationStats,
    /// Inventory totals
    pub inventory: InventoryStats,
    /// Reservations per equipment item, most used first
    pub equipment_usage: Vec<UsageEntry>,
    /// Reservations per room, most booked first
    pub room_bookings: Vec<UsageEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStats {
    pub total: usize,
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    pub declined: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub users: usize,
    pub equipment_items: usize,
    /// Sum of total quantities
    pub equipment_units: u64,
    /// Units free right now
    pub equipment_units_available: u64,
    pub rooms: usize,
    /// Rooms free right now
    pub rooms_available: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub item_id: String,
    pub name: String,
    /// Reservations referencing the item, any status
    pub count: usize,
}

/// Get portal statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Portal statistics", body = StatsResponse),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    claims.require_admin()?;
    Ok(Json(state.services.stats.get_stats().await?))
}
