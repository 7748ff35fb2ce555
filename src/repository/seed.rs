//! Built-in data set used when a collection has never been stored

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Equipment, EquipmentCategory, EquipmentStatus, ItemType, Reservation, ReservationStatus,
    Role, Room, User, PLACEHOLDER_IMAGE_URL,
};

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, username: &str, password: &str, role: Role| User {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        password: Some(password.to_string()),
        role,
        penalty_points: 0,
    };
    vec![
        user("1", "Student User", "student", "student123", Role::Student),
        user("2", "Faculty Member", "teacher", "teacher123", Role::Faculty),
        user("3", "Admin User", "admin", "admin123", Role::Admin),
    ]
}

pub fn equipment() -> Vec<Equipment> {
    let item = |id: &str, name: &str, category, total_quantity, ai_hint: &str| Equipment {
        id: id.to_string(),
        name: name.to_string(),
        category,
        total_quantity,
        status: EquipmentStatus::Available,
        image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        ai_hint: ai_hint.to_string(),
    };
    vec![
        item("e1", "EPSON Projector EX3280", EquipmentCategory::Projector, 10, "projector classroom"),
        item("e2", "Canon EOS R5", EquipmentCategory::Camera, 5, "dslr camera"),
        item("e3", "Sony a7 IV", EquipmentCategory::Camera, 3, "mirrorless camera"),
        item("e4", "Shure SM58 Wireless Mic", EquipmentCategory::Microphone, 15, "wireless microphone"),
        item("e5", "Rode Wireless Go II", EquipmentCategory::Microphone, 8, "lavalier microphone"),
        item("e6", "Tripod Stand", EquipmentCategory::Other, 20, "camera tripod"),
    ]
}

pub fn rooms() -> Vec<Room> {
    let room = |id: &str, name: &str, capacity, equipment: &[&str], ai_hint: &str| Room {
        id: id.to_string(),
        name: name.to_string(),
        capacity,
        equipment: equipment.iter().map(|s| s.to_string()).collect(),
        image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        ai_hint: ai_hint.to_string(),
    };
    vec![
        room("r1", "AV Room 1", 30, &["EPSON Projector EX3280", "Whiteboard"], "seminar room"),
        room("r2", "AV Room 2", 50, &["EPSON Projector EX3280", "Podium with Mic"], "lecture hall"),
        room(
            "r3",
            "Recording Studio",
            5,
            &["Sony a7 IV", "Rode Wireless Go II", "Green Screen"],
            "recording studio",
        ),
    ]
}

/// Sample reservations placed relative to `now`
pub fn reservations(now: DateTime<Utc>) -> Vec<Reservation> {
    let reservation = |id: &str, user_id: &str, item_id: &str, item_type, start, end, status| {
        Reservation {
            id: id.to_string(),
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            item_type,
            start,
            end,
            purpose: None,
            status,
        }
    };
    vec![
        reservation(
            "res1",
            "1",
            "e2",
            ItemType::Equipment,
            now - Duration::days(2),
            now - Duration::days(1),
            ReservationStatus::Completed,
        ),
        reservation(
            "res2",
            "1",
            "e4",
            ItemType::Equipment,
            now,
            now + Duration::hours(2),
            ReservationStatus::Active,
        ),
        reservation(
            "res3",
            "2",
            "r1",
            ItemType::Room,
            now,
            now + Duration::hours(3),
            ReservationStatus::Active,
        ),
    ]
}
