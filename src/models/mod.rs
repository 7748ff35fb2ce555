//! Data models for the reservation portal

pub mod equipment;
pub mod reservation;
pub mod room;
pub mod user;

use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use equipment::{Equipment, EquipmentCategory, EquipmentStatus};
pub use reservation::{ItemType, Reservation, ReservationStatus, Window};
pub use room::Room;
pub use user::{Role, User, UserInfo};

/// Image used when an inventory record is created without one
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400.png";

/// Treats `""` (what an untouched form field submits) as an absent value
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
