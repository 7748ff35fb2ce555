//! Business logic services

pub mod auth;
pub mod availability;
pub mod equipment;
pub mod reservations;
pub mod rooms;
pub mod stats;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub rooms: rooms::RoomsService,
    pub reservations: reservations::ReservationsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            users: users::UsersService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            rooms: rooms::RoomsService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
