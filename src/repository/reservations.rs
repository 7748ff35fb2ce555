//! Reservation collection and status transitions

use super::{Collection, DataSet, Record, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{ItemType, Reservation, ReservationStatus},
};

impl Record for Reservation {
    const KEY: &'static str = super::storage::RESERVATIONS_KEY;
    const ID_PREFIX: &'static str = "res";
    const LABEL: &'static str = "Reservation";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &DataSet) -> &Collection<Self> {
        &data.reservations
    }

    fn collection_mut(data: &mut DataSet) -> &mut Collection<Self> {
        &mut data.reservations
    }

    fn not_found(id: &str) -> AppError {
        AppError::ReservationNotFound(format!("Reservation {} not found", id))
    }
}

impl DataSet {
    /// Display name of the reserved item, "Unknown Item" if it no longer exists
    pub fn item_name(&self, item_id: &str, item_type: ItemType) -> String {
        let name = match item_type {
            ItemType::Equipment => self.equipment.get(item_id).map(|e| e.name.clone()),
            ItemType::Room => self.rooms.get(item_id).map(|r| r.name.clone()),
        };
        name.unwrap_or_else(|| "Unknown Item".to_string())
    }
}

impl Repository {
    /// Move reservation `id` to `next` if its current status allows it
    pub async fn reservations_transition(
        &self,
        id: &str,
        next: ReservationStatus,
    ) -> AppResult<Reservation> {
        self.update_with::<Reservation, _>(id, |_, reservation| {
            if !reservation.status.can_transition_to(next) {
                return Err(AppError::InvalidTransition(format!(
                    "Reservation {} is {} and cannot become {}",
                    reservation.id, reservation.status, next
                )));
            }
            reservation.status = next;
            Ok(())
        })
        .await
    }
}
