//! User management endpoints (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        reservation::ReservationDetails,
        user::{CreateUser, UpdatePenalty, UpdateUser, UserInfo},
    },
};

use super::AuthenticatedUser;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    claims.require_admin()?;
    Ok(Json(state.services.users.list().await?))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    claims.require_admin()?;
    Ok(Json(state.services.users.get_by_id(&id).await?))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    claims.require_admin()?;
    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserInfo),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<UserInfo>> {
    claims.require_admin()?;
    Ok(Json(state.services.users.update_user(&id, user).await?))
}

/// Set a user's penalty points
#[utoipa::path(
    put,
    path = "/users/{id}/penalty",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdatePenalty,
    responses(
        (status = 200, description = "Penalty updated", body = UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_penalty(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePenalty>,
) -> AppResult<Json<UserInfo>> {
    claims.require_admin()?;
    let user = state
        .services
        .users
        .set_penalty_points(&id, request.penalty_points)
        .await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reservation history of a user, most recent first
#[utoipa::path(
    get,
    path = "/users/{id}/reservations",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User reservations", body = Vec<ReservationDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    claims.require_admin()?;
    Ok(Json(state.services.reservations.for_user(&id).await?))
}
