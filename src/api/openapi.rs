//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, availability, equipment, health, reservations, rooms, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AV Reservation Portal API",
        version = "1.0.0",
        description = "Equipment and room reservation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::update_penalty,
        users::delete_user,
        users::get_user_reservations,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        rooms::get_room_calendar,
        // Reservations
        availability::get_availability,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::my_reservations,
        reservations::get_reservation,
        reservations::approve_reservation,
        reservations::decline_reservation,
        reservations::complete_reservation,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdatePenalty,
            // Equipment
            crate::models::equipment::EquipmentCategory,
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentAvailability,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Rooms
            crate::models::room::Room,
            crate::models::room::RoomAvailability,
            crate::models::room::EquipmentLabels,
            crate::models::room::CreateRoom,
            crate::models::room::UpdateRoom,
            crate::services::rooms::RoomSchedule,
            // Reservations
            crate::models::reservation::ItemType,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::AvailabilityResponse,
            // Stats
            stats::StatsResponse,
            stats::ReservationStats,
            stats::InventoryStats,
            stats::UsageEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "rooms", description = "Rooms and room calendar"),
        (name = "reservations", description = "Reservation requests and approvals"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
