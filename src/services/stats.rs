//! Statistics service

use chrono::{DateTime, Utc};

use crate::{
    api::stats::{InventoryStats, ReservationStats, StatsResponse, UsageEntry},
    error::AppResult,
    models::{ItemType, Reservation, ReservationStatus},
    repository::{DataSet, Repository},
};

use super::availability;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let data = self.repository.read().await;
        Ok(compute(&data, Utc::now()))
    }
}

fn compute(data: &DataSet, now: DateTime<Utc>) -> StatsResponse {
    let all: Vec<&Reservation> = data.reservations.values().collect();
    let count = |status: ReservationStatus| all.iter().filter(|r| r.status == status).count();

    let reservations = ReservationStats {
        total: all.len(),
        pending: count(ReservationStatus::Pending),
        active: count(ReservationStatus::Active),
        completed: count(ReservationStatus::Completed),
        overdue: count(ReservationStatus::Overdue),
        declined: count(ReservationStatus::Declined),
    };

    let usage = |item_id: &str, item_type: ItemType| {
        all.iter().filter(|r| r.is_for(item_id, item_type)).count()
    };

    let mut equipment_usage: Vec<UsageEntry> = data
        .equipment
        .values()
        .map(|e| UsageEntry {
            item_id: e.id.clone(),
            name: e.name.clone(),
            count: usage(&e.id, ItemType::Equipment),
        })
        .collect();
    let mut room_bookings: Vec<UsageEntry> = data
        .rooms
        .values()
        .map(|r| UsageEntry {
            item_id: r.id.clone(),
            name: r.name.clone(),
            count: usage(&r.id, ItemType::Room),
        })
        .collect();
    // Most used first; ties keep inventory order
    equipment_usage.sort_by(|a, b| b.count.cmp(&a.count));
    room_bookings.sort_by(|a, b| b.count.cmp(&a.count));

    let inventory = InventoryStats {
        users: data.users.len(),
        equipment_items: data.equipment.len(),
        equipment_units: data.equipment.values().map(|e| e.total_quantity as u64).sum(),
        equipment_units_available: data
            .equipment
            .values()
            .map(|e| availability::available_count(e, all.iter().copied(), now) as u64)
            .sum(),
        rooms: data.rooms.len(),
        rooms_available: data
            .rooms
            .keys()
            .filter(|id| availability::is_room_available(id, all.iter().copied(), now))
            .count(),
    };

    StatsResponse {
        reservations,
        inventory,
        equipment_usage,
        room_bookings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::storage::MemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stats_on_seed_data() {
        let repository = Repository::open(Arc::new(MemoryStorage::new()), true)
            .await
            .unwrap();
        let stats = StatsService::new(repository).get_stats().await.unwrap();

        assert_eq!(stats.reservations.total, 3);
        assert_eq!(stats.reservations.active, 2);
        assert_eq!(stats.reservations.completed, 1);
        assert_eq!(stats.reservations.overdue, 0);

        assert_eq!(stats.inventory.users, 3);
        assert_eq!(stats.inventory.equipment_units, 61);
        assert_eq!(stats.inventory.equipment_units_available, 60);
        assert_eq!(stats.inventory.rooms_available, 2);

        let top: Vec<(&str, usize)> = stats
            .equipment_usage
            .iter()
            .take(3)
            .map(|u| (u.item_id.as_str(), u.count))
            .collect();
        assert_eq!(top, vec![("e2", 1), ("e4", 1), ("e1", 0)]);
        assert_eq!(stats.room_bookings[0].item_id, "r1");
        assert_eq!(stats.room_bookings[0].count, 1);
    }
}
