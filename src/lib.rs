//! AV Reservation Portal
//!
//! REST JSON API for reserving audio-visual equipment and rooms: inventory
//! management, reservation requests with an admin approval lifecycle, and
//! live availability.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route(
            "/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route("/users/:id/penalty", put(api::users::update_penalty))
        .route("/users/:id/reservations", get(api::users::get_user_reservations))
        // Equipment
        .route(
            "/equipment",
            get(api::equipment::list_equipment).post(api::equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::update_equipment)
                .delete(api::equipment::delete_equipment),
        )
        // Rooms
        .route(
            "/rooms",
            get(api::rooms::list_rooms).post(api::rooms::create_room),
        )
        .route(
            "/rooms/:id",
            get(api::rooms::get_room)
                .put(api::rooms::update_room)
                .delete(api::rooms::delete_room),
        )
        .route("/rooms/:id/calendar", get(api::rooms::get_room_calendar))
        // Reservations
        .route("/availability", get(api::availability::get_availability))
        .route(
            "/reservations",
            get(api::reservations::list_reservations).post(api::reservations::create_reservation),
        )
        .route("/reservations/mine", get(api::reservations::my_reservations))
        .route("/reservations/:id", get(api::reservations::get_reservation))
        .route(
            "/reservations/:id/approve",
            post(api::reservations::approve_reservation),
        )
        .route(
            "/reservations/:id/decline",
            post(api::reservations::decline_reservation),
        )
        .route(
            "/reservations/:id/complete",
            post(api::reservations::complete_reservation),
        )
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
