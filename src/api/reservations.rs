//! Reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::reservation::{CreateReservation, Reservation, ReservationDetails, ReservationQuery},
};

use super::AuthenticatedUser;

/// List reservations (admin), earliest start first
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<ReservationDetails>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    claims.require_admin()?;
    Ok(Json(state.services.reservations.list(&query).await?))
}

/// Request a reservation for the session user. The request starts Pending.
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation requested", body = Reservation),
        (status = 400, description = "Invalid window"),
        (status = 403, description = "Students cannot book rooms"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item not available")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state
        .services
        .reservations
        .request(&claims.user_id, claims.role, request)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Reservation history of the session user
#[utoipa::path(
    get,
    path = "/reservations/mine",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "My reservations", body = Vec<ReservationDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    Ok(Json(state.services.reservations.for_user(&claims.user_id).await?))
}

/// Get one reservation. Non-admins may only read their own.
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation", body = Reservation),
        (status = 403, description = "Reservation belongs to another user"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get(&id).await?;
    if !claims.is_admin() && reservation.user_id != claims.user_id {
        return Err(AppError::Authorization(
            "Reservation belongs to another user".to_string(),
        ));
    }
    Ok(Json(reservation))
}

/// Approve a pending reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/approve",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation approved", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not pending")
    )
)]
pub async fn approve_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_admin()?;
    Ok(Json(state.services.reservations.approve(&id).await?))
}

/// Decline a pending reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/decline",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation declined", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not pending")
    )
)]
pub async fn decline_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_admin()?;
    Ok(Json(state.services.reservations.decline(&id).await?))
}

/// Mark an active reservation as returned
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation completed", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not active")
    )
)]
pub async fn complete_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_admin()?;
    Ok(Json(state.services.reservations.complete(&id).await?))
}
