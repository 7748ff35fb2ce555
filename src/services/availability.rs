//! Availability predicates over the reservation list
//!
//! Only `Active` reservations hold an item at an instant. Window queries also
//! report `Pending` requests, since those are what a calendar shows as booked.

use chrono::{DateTime, Utc};

use crate::models::{Equipment, ItemType, Reservation, ReservationStatus, Window};

/// Active reservations of the item whose window contains `instant`
pub fn active_at<'a>(
    reservations: impl IntoIterator<Item = &'a Reservation>,
    item_id: &'a str,
    item_type: ItemType,
    instant: DateTime<Utc>,
) -> impl Iterator<Item = &'a Reservation> {
    reservations.into_iter().filter(move |r| {
        r.is_for(item_id, item_type)
            && r.status == ReservationStatus::Active
            && r.window().contains(instant)
    })
}

pub fn is_reserved_at<'a>(
    reservations: impl IntoIterator<Item = &'a Reservation>,
    item_id: &'a str,
    item_type: ItemType,
    instant: DateTime<Utc>,
) -> bool {
    active_at(reservations, item_id, item_type, instant)
        .next()
        .is_some()
}

/// Units of `equipment` not held at `instant`, never below zero
pub fn available_count<'a>(
    equipment: &'a Equipment,
    reservations: impl IntoIterator<Item = &'a Reservation>,
    instant: DateTime<Utc>,
) -> u32 {
    let held = active_at(reservations, &equipment.id, ItemType::Equipment, instant).count();
    equipment
        .total_quantity
        .saturating_sub(u32::try_from(held).unwrap_or(u32::MAX))
}

pub fn is_room_available<'a>(
    room_id: &'a str,
    reservations: impl IntoIterator<Item = &'a Reservation>,
    instant: DateTime<Utc>,
) -> bool {
    !is_reserved_at(reservations, room_id, ItemType::Room, instant)
}

/// Active or Pending reservations of the item overlapping `window`
pub fn overlapping<'a>(
    reservations: impl IntoIterator<Item = &'a Reservation>,
    item_id: &'a str,
    item_type: ItemType,
    window: Window,
) -> Vec<&'a Reservation> {
    reservations
        .into_iter()
        .filter(|r| {
            r.is_for(item_id, item_type) && r.status.is_holding() && r.window().overlaps(&window)
        })
        .collect()
}
