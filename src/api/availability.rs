//! Availability lookup endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{AvailabilityQuery, AvailabilityResponse},
};

use super::AuthenticatedUser;

/// Is an item free at an instant, and which reservations overlap a window
#[utoipa::path(
    get,
    path = "/availability",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Item availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid window"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    Ok(Json(state.services.reservations.availability(&query).await?))
}
