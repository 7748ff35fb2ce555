//! Reservation lifecycle service

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{
            AvailabilityQuery, AvailabilityResponse, CreateReservation, ReservationDetails,
            ReservationQuery,
        },
        ItemType, Reservation, ReservationStatus, Role, Window,
    },
    repository::{DataSet, Repository},
};

use super::availability;

/// Longest window a single reservation may span
pub const MAX_RESERVATION_DAYS: i64 = 90;

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Submit a reservation request on behalf of `user_id`.
    ///
    /// The item must be free at the moment of the request. The proposed
    /// window itself is not checked against other bookings.
    pub async fn request(
        &self,
        user_id: &str,
        role: Role,
        request: CreateReservation,
    ) -> AppResult<Reservation> {
        self.request_at(user_id, role, request, Utc::now()).await
    }

    pub(crate) async fn request_at(
        &self,
        user_id: &str,
        role: Role,
        request: CreateReservation,
        now: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        if request.item_type == ItemType::Room && role == Role::Student {
            return Err(AppError::Authorization(
                "Room booking is reserved to faculty".to_string(),
            ));
        }

        let window = Window::new(request.start, request.end).ok_or_else(|| {
            AppError::Validation("end: End time must be after start time".to_string())
        })?;
        if window.end - window.start > Duration::days(MAX_RESERVATION_DAYS) {
            return Err(AppError::Validation(format!(
                "end: Reservations cannot span more than {} days",
                MAX_RESERVATION_DAYS
            )));
        }
        let earliest = (now - Duration::days(1))
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        if window.start < earliest {
            return Err(AppError::Validation(
                "start: Reservations cannot start before yesterday".to_string(),
            ));
        }

        let purpose = request
            .purpose
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let reservation = self
            .repository
            .insert_with::<Reservation, _>(|data, id| {
                if !data.users.contains_key(user_id) {
                    return Err(AppError::UserNotFound(format!("User {} not found", user_id)));
                }
                ensure_requestable(data, &request.item_id, request.item_type, now)?;

                Ok(Reservation {
                    id,
                    user_id: user_id.to_string(),
                    item_id: request.item_id.clone(),
                    item_type: request.item_type,
                    start: window.start,
                    end: window.end,
                    purpose,
                    status: ReservationStatus::Pending,
                })
            })
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            user_id = %reservation.user_id,
            item_id = %reservation.item_id,
            item_type = %reservation.item_type,
            "Reservation requested"
        );
        Ok(reservation)
    }

    /// Pending -> Active
    pub async fn approve(&self, id: &str) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Active).await
    }

    /// Pending -> Declined
    pub async fn decline(&self, id: &str) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Declined).await
    }

    /// Active -> Completed (item returned)
    pub async fn complete(&self, id: &str) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Completed).await
    }

    async fn transition(&self, id: &str, next: ReservationStatus) -> AppResult<Reservation> {
        let reservation = self.repository.reservations_transition(id, next).await?;
        tracing::info!(reservation_id = %id, status = %next, "Reservation status changed");
        Ok(reservation)
    }

    pub async fn get(&self, id: &str) -> AppResult<Reservation> {
        self.repository.get::<Reservation>(id).await
    }

    /// Reservations matching `query`, earliest start first
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<ReservationDetails>> {
        let data = self.repository.read().await;
        let mut details: Vec<ReservationDetails> = data
            .reservations
            .values()
            .filter(|r| query.matches(r))
            .map(|r| with_names(&data, r))
            .collect();
        details.sort_by_key(|d| d.reservation.start);
        Ok(details)
    }

    /// A user's reservation history, most recent start first
    pub async fn for_user(&self, user_id: &str) -> AppResult<Vec<ReservationDetails>> {
        let data = self.repository.read().await;
        if !data.users.contains_key(user_id) {
            return Err(AppError::UserNotFound(format!("User {} not found", user_id)));
        }
        let mut details: Vec<ReservationDetails> = data
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| with_names(&data, r))
            .collect();
        details.sort_by(|a, b| b.reservation.start.cmp(&a.reservation.start));
        Ok(details)
    }

    /// Is the item free at an instant, and what holds it during a window
    pub async fn availability(&self, query: &AvailabilityQuery) -> AppResult<AvailabilityResponse> {
        let window = match (query.start, query.end) {
            (Some(start), Some(end)) => Some(Window::new(start, end).ok_or_else(|| {
                AppError::Validation("end: End time must be after start time".to_string())
            })?),
            (None, None) => None,
            _ => {
                return Err(AppError::BadRequest(
                    "start and end must be given together".to_string(),
                ))
            }
        };
        let at = query
            .at
            .or(window.map(|w| w.start))
            .unwrap_or_else(Utc::now);

        let data = self.repository.read().await;
        let reservations = data.reservations.values();

        let (available, available_count) = match query.item_type {
            ItemType::Equipment => {
                let equipment = data
                    .equipment
                    .get(&query.item_id)
                    .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", query.item_id)))?;
                let count = availability::available_count(equipment, reservations.clone(), at);
                (count > 0, Some(count))
            }
            ItemType::Room => {
                if !data.rooms.contains_key(&query.item_id) {
                    return Err(AppError::NotFound(format!("Room {} not found", query.item_id)));
                }
                (
                    availability::is_room_available(&query.item_id, reservations.clone(), at),
                    None,
                )
            }
        };

        let conflicts = match window {
            Some(window) => {
                availability::overlapping(reservations, &query.item_id, query.item_type, window)
                    .into_iter()
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        };

        Ok(AvailabilityResponse {
            item_id: query.item_id.clone(),
            item_type: query.item_type,
            at,
            available,
            available_count,
            conflicts,
        })
    }
}

/// The rules the booking screens applied before letting a request through
fn ensure_requestable(
    data: &DataSet,
    item_id: &str,
    item_type: ItemType,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let reservations = data.reservations.values();
    match item_type {
        ItemType::Equipment => {
            let equipment = data
                .equipment
                .get(item_id)
                .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", item_id)))?;
            if !equipment.status.is_bookable() {
                return Err(AppError::Unavailable(format!(
                    "{} is not bookable while {:?}",
                    equipment.name, equipment.status
                )));
            }
            if availability::available_count(equipment, reservations, now) == 0 {
                return Err(AppError::Unavailable(format!(
                    "No units of {} are currently available",
                    equipment.name
                )));
            }
        }
        ItemType::Room => {
            let room = data
                .rooms
                .get(item_id)
                .ok_or_else(|| AppError::NotFound(format!("Room {} not found", item_id)))?;
            if !availability::is_room_available(&room.id, reservations, now) {
                return Err(AppError::Unavailable(format!("{} is currently booked", room.name)));
            }
        }
    }
    Ok(())
}

pub(crate) fn with_names(data: &DataSet, reservation: &Reservation) -> ReservationDetails {
    ReservationDetails {
        item_name: data.item_name(&reservation.item_id, reservation.item_type),
        user_name: data.user_name(&reservation.user_id),
        reservation: reservation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, EquipmentCategory, EquipmentStatus};
    use crate::repository::storage::MemoryStorage;
    use std::sync::Arc;

    async fn service() -> ReservationsService {
        service_with_repository().await.0
    }

    async fn service_with_repository() -> (ReservationsService, Repository) {
        let repository = Repository::open(Arc::new(MemoryStorage::new()), true)
            .await
            .unwrap();
        (ReservationsService::new(repository.clone()), repository)
    }

    fn request(item_id: &str, item_type: ItemType, hours_from_now: i64) -> CreateReservation {
        let start = Utc::now() + Duration::hours(hours_from_now);
        CreateReservation {
            item_id: item_id.to_string(),
            item_type,
            start,
            end: start + Duration::hours(1),
            purpose: Some("  Lecture recording ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_request_starts_pending() {
        let service = service().await;
        let reservation = service
            .request("1", Role::Student, request("e2", ItemType::Equipment, 1))
            .await
            .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.id, "res4");
        assert_eq!(reservation.purpose.as_deref(), Some("Lecture recording"));
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let service = service().await;
        let created = service
            .request("2", Role::Faculty, request("r2", ItemType::Room, 2))
            .await
            .unwrap();

        let approved = service.approve(&created.id).await.unwrap();
        assert_eq!(approved.status, ReservationStatus::Active);

        // Approving again, or declining an active one, is refused
        assert!(matches!(
            service.approve(&created.id).await,
            Err(AppError::InvalidTransition(_))
        ));
        assert!(matches!(
            service.decline(&created.id).await,
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(
            service.get(&created.id).await.unwrap().status,
            ReservationStatus::Active
        );

        let completed = service.complete(&created.id).await.unwrap();
        assert_eq!(completed.status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn test_decline_and_complete_rules() {
        let service = service().await;
        let created = service
            .request("1", Role::Student, request("e1", ItemType::Equipment, 1))
            .await
            .unwrap();
        assert!(matches!(
            service.complete(&created.id).await,
            Err(AppError::InvalidTransition(_))
        ));
        let declined = service.decline(&created.id).await.unwrap();
        assert_eq!(declined.status, ReservationStatus::Declined);
        assert!(matches!(
            service.approve("res99").await,
            Err(AppError::ReservationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_request_rules() {
        let service = service().await;

        // Students cannot book rooms
        assert!(matches!(
            service.request("1", Role::Student, request("r2", ItemType::Room, 1)).await,
            Err(AppError::Authorization(_))
        ));
        // r1 is held right now by the seeded active reservation
        assert!(matches!(
            service.request("2", Role::Faculty, request("r1", ItemType::Room, 24)).await,
            Err(AppError::Unavailable(_))
        ));
        assert!(matches!(
            service.request("2", Role::Faculty, request("r9", ItemType::Room, 1)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.request("42", Role::Faculty, request("e1", ItemType::Equipment, 1)).await,
            Err(AppError::UserNotFound(_))
        ));

        let mut inverted = request("e1", ItemType::Equipment, 1);
        inverted.end = inverted.start;
        assert!(matches!(
            service.request("1", Role::Student, inverted).await,
            Err(AppError::Validation(_))
        ));

        let past = request("e1", ItemType::Equipment, -72);
        assert!(matches!(
            service.request("1", Role::Student, past).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_request_window_length_is_capped() {
        let service = service().await;
        let mut long = request("e1", ItemType::Equipment, 1);
        long.end = long.start + Duration::days(MAX_RESERVATION_DAYS);
        service.request("1", Role::Student, long).await.unwrap();

        let mut too_long = request("e1", ItemType::Equipment, 1);
        too_long.end = too_long.start + Duration::days(MAX_RESERVATION_DAYS) + Duration::seconds(1);
        assert!(matches!(
            service.request("1", Role::Student, too_long).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_equipment_out_of_service_cannot_be_requested() {
        let (service, repository) = service_with_repository().await;
        for status in [EquipmentStatus::Maintenance, EquipmentStatus::Unavailable] {
            repository
                .update_with::<Equipment, _>("e3", |_, equipment| {
                    equipment.status = status;
                    Ok(())
                })
                .await
                .unwrap();
            assert!(matches!(
                service.request("1", Role::Student, request("e3", ItemType::Equipment, 1)).await,
                Err(AppError::Unavailable(_))
            ));
        }

        repository
            .update_with::<Equipment, _>("e3", |_, equipment| {
                equipment.status = EquipmentStatus::PartiallyAvailable;
                Ok(())
            })
            .await
            .unwrap();
        assert!(service
            .request("1", Role::Student, request("e3", ItemType::Equipment, 1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_last_unit_held_blocks_new_requests() {
        let (service, repository) = service_with_repository().await;
        let single = repository
            .insert_with::<Equipment, _>(|_, id| {
                Ok(Equipment {
                    id,
                    name: "Zoom H6 Recorder".to_string(),
                    category: EquipmentCategory::Other,
                    total_quantity: 1,
                    status: EquipmentStatus::Available,
                    image_url: crate::models::PLACEHOLDER_IMAGE_URL.to_string(),
                    ai_hint: "audio recorder".to_string(),
                })
            })
            .await
            .unwrap();
        assert_eq!(single.id, "e7");

        let mut current = request("e7", ItemType::Equipment, 0);
        current.start -= Duration::minutes(5);
        let held = service.request("1", Role::Student, current).await.unwrap();

        // A pending request alone does not hold the unit
        let queued = service
            .request("2", Role::Faculty, request("e7", ItemType::Equipment, 3))
            .await
            .unwrap();
        assert_eq!(queued.status, ReservationStatus::Pending);

        service.approve(&held.id).await.unwrap();
        assert!(matches!(
            service.request("2", Role::Faculty, request("e7", ItemType::Equipment, 3)).await,
            Err(AppError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_for_user_most_recent_first() {
        let service = service().await;
        service
            .request("1", Role::Student, request("e6", ItemType::Equipment, 5))
            .await
            .unwrap();
        let history = service.for_user("1").await.unwrap();
        let ids: Vec<&str> = history.iter().map(|d| d.reservation.id.as_str()).collect();
        assert_eq!(ids, vec!["res4", "res2", "res1"]);
        assert_eq!(history[0].item_name, "Tripod Stand");
        assert_eq!(history[0].user_name, "Student User");
    }

    #[tokio::test]
    async fn test_list_by_status_earliest_first() {
        let service = service().await;
        service
            .request("1", Role::Student, request("e6", ItemType::Equipment, 5))
            .await
            .unwrap();
        service
            .request("2", Role::Faculty, request("e5", ItemType::Equipment, 2))
            .await
            .unwrap();
        let pending = service
            .list(&ReservationQuery {
                status: Some(ReservationStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<&str> = pending.iter().map(|d| d.reservation.id.as_str()).collect();
        assert_eq!(ids, vec!["res5", "res4"]);
    }

    #[tokio::test]
    async fn test_availability_query() {
        let service = service().await;
        let now = Utc::now();

        let camera = service
            .availability(&AvailabilityQuery {
                item_id: "e4".to_string(),
                item_type: ItemType::Equipment,
                at: Some(now + Duration::minutes(30)),
                start: None,
                end: None,
            })
            .await
            .unwrap();
        assert_eq!(camera.available_count, Some(14));
        assert!(camera.available);

        let room = service
            .availability(&AvailabilityQuery {
                item_id: "r1".to_string(),
                item_type: ItemType::Room,
                at: None,
                start: Some(now + Duration::hours(1)),
                end: Some(now + Duration::hours(5)),
            })
            .await
            .unwrap();
        assert!(!room.available);
        assert_eq!(room.conflicts.len(), 1);
        assert_eq!(room.conflicts[0].id, "res3");
    }
}
