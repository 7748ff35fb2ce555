//! Equipment service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::equipment::{
        CreateEquipment, Equipment, EquipmentAvailability, EquipmentCategory, UpdateEquipment,
    },
    repository::Repository,
};

use super::availability;

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All equipment with units available right now, optionally for one category
    pub async fn list(&self, category: Option<EquipmentCategory>) -> AppResult<Vec<EquipmentAvailability>> {
        let now = Utc::now();
        let data = self.repository.read().await;
        Ok(data
            .equipment
            .values()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .map(|e| {
                let available_count = availability::available_count(e, data.reservations.values(), now);
                EquipmentAvailability {
                    equipment: e.clone(),
                    available_count,
                    is_available: available_count > 0,
                }
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.repository.get::<Equipment>(id).await
    }

    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self
            .repository
            .insert_with::<Equipment, _>(|_, id| Ok(data.into_equipment(id)))
            .await?;
        tracing::info!(equipment_id = %equipment.id, "Added equipment {}", equipment.name);
        Ok(equipment)
    }

    pub async fn update(&self, id: &str, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.repository
            .update_with::<Equipment, _>(id, |_, equipment| {
                data.apply(equipment);
                Ok(())
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.repository.delete::<Equipment>(id).await?;
        tracing::info!(equipment_id = %id, "Deleted equipment {}", removed.name);
        Ok(())
    }
}
