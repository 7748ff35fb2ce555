//! Room inventory and calendar endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::room::{CreateRoom, Room, RoomAvailability, UpdateRoom},
    services::rooms::RoomSchedule,
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Day to list reservations for (YYYY-MM-DD, default: today UTC)
    pub date: Option<NaiveDate>,
}

/// List rooms, flagged with whether they are free right now
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Room list", body = Vec<RoomAvailability>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_rooms(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RoomAvailability>>> {
    Ok(Json(state.services.rooms.list().await?))
}

/// Get room by ID
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room details", body = Room),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Room>> {
    Ok(Json(state.services.rooms.get_by_id(&id).await?))
}

/// Add a room
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(room): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    claims.require_admin()?;
    let created = state.services.rooms.create(room).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Room ID")
    ),
    request_body = UpdateRoom,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(room): Json<UpdateRoom>,
) -> AppResult<Json<Room>> {
    claims.require_admin()?;
    Ok(Json(state.services.rooms.update(&id, room).await?))
}

/// Delete a room
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Room ID")
    ),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn delete_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.rooms.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Room calendar: reserved days and the schedule of one day
#[utoipa::path(
    get,
    path = "/rooms/{id}/calendar",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Room ID"),
        CalendarQuery
    ),
    responses(
        (status = 200, description = "Room calendar", body = RoomSchedule),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room_calendar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<RoomSchedule>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.services.rooms.schedule(&id, date).await?))
}
