//! Room service and room calendar

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::ReservationDetails,
        room::{CreateRoom, Room, RoomAvailability, UpdateRoom},
        ItemType,
    },
    repository::Repository,
};

use super::{availability, reservations::with_names};

/// Schedule of one room for the calendar view
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSchedule {
    pub room_id: String,
    pub date: NaiveDate,
    /// Days touched by an active or pending reservation, ascending, within
    /// a year of `date`
    pub reserved_days: Vec<NaiveDate>,
    /// Reservations whose day range includes `date`
    pub reservations: Vec<ReservationDetails>,
}

/// Reserved days are reported at most this many days either side of the
/// requested date
pub const CALENDAR_SPAN_DAYS: i64 = 366;

#[derive(Clone)]
pub struct RoomsService {
    repository: Repository,
}

impl RoomsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All rooms, flagged with whether they are free right now
    pub async fn list(&self) -> AppResult<Vec<RoomAvailability>> {
        let now = Utc::now();
        let data = self.repository.read().await;
        Ok(data
            .rooms
            .values()
            .map(|room| RoomAvailability {
                is_available: availability::is_room_available(&room.id, data.reservations.values(), now),
                room: room.clone(),
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Room> {
        self.repository.get::<Room>(id).await
    }

    pub async fn create(&self, data: CreateRoom) -> AppResult<Room> {
        data.validate()?;
        let labels = data.equipment.clone().into_labels();
        if labels.is_empty() {
            return Err(AppError::Validation(
                "equipment: Please list at least one piece of equipment".to_string(),
            ));
        }
        let room = self
            .repository
            .insert_with::<Room, _>(|_, id| Ok(data.into_room(id, labels)))
            .await?;
        tracing::info!(room_id = %room.id, "Added room {}", room.name);
        Ok(room)
    }

    pub async fn update(&self, id: &str, data: UpdateRoom) -> AppResult<Room> {
        data.validate()?;
        let labels = match data.equipment {
            Some(equipment) => {
                let labels = equipment.into_labels();
                if labels.is_empty() {
                    return Err(AppError::Validation(
                        "equipment: Please list at least one piece of equipment".to_string(),
                    ));
                }
                Some(labels)
            }
            None => None,
        };

        self.repository
            .update_with::<Room, _>(id, |_, room| {
                if let Some(name) = data.name {
                    room.name = name;
                }
                if let Some(capacity) = data.capacity {
                    room.capacity = capacity;
                }
                if let Some(labels) = labels {
                    room.equipment = labels;
                }
                if let Some(image_url) = data.image_url {
                    room.image_url = image_url;
                }
                if let Some(ai_hint) = data.ai_hint {
                    room.ai_hint = ai_hint;
                }
                Ok(())
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.repository.delete::<Room>(id).await?;
        tracing::info!(room_id = %id, "Deleted room {}", removed.name);
        Ok(())
    }

    /// Calendar for `room_id` with the schedule of `date`
    pub async fn schedule(&self, room_id: &str, date: NaiveDate) -> AppResult<RoomSchedule> {
        let data = self.repository.read().await;
        if !data.rooms.contains_key(room_id) {
            return Err(AppError::NotFound(format!("Room {} not found", room_id)));
        }

        let held: Vec<_> = data
            .reservations
            .values()
            .filter(|r| r.is_for(room_id, ItemType::Room) && r.status.is_holding())
            .collect();

        let span = Duration::days(CALENDAR_SPAN_DAYS);
        let from = date.checked_sub_signed(span).unwrap_or(NaiveDate::MIN);
        let to = date.checked_add_signed(span).unwrap_or(NaiveDate::MAX);

        let mut reserved_days = BTreeSet::new();
        for reservation in &held {
            let last = reservation.end.date_naive().min(to);
            let mut day = reservation.start.date_naive().max(from);
            while day <= last {
                reserved_days.insert(day);
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }

        let mut reservations: Vec<ReservationDetails> = held
            .iter()
            .filter(|r| r.start.date_naive() <= date && date <= r.end.date_naive())
            .map(|r| with_names(&data, r))
            .collect();
        reservations.sort_by_key(|d| d.reservation.start);

        Ok(RoomSchedule {
            room_id: room_id.to_string(),
            date,
            reserved_days: reserved_days.into_iter().collect(),
            reservations,
        })
    }
}
