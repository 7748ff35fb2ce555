//! Equipment model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{empty_string_as_none, PLACEHOLDER_IMAGE_URL};

/// Equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EquipmentCategory {
    Projector,
    Camera,
    Microphone,
    Other,
}

/// Administrative equipment status, set by hand and independent of reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    Available,
    #[serde(rename = "Partially Available")]
    PartiallyAvailable,
    Unavailable,
    Maintenance,
}

impl EquipmentStatus {
    /// Whether new reservation requests may target equipment in this status
    pub fn is_bookable(&self) -> bool {
        matches!(self, EquipmentStatus::Available | EquipmentStatus::PartiallyAvailable)
    }
}

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub category: EquipmentCategory,
    /// Number of identical units
    pub total_quantity: u32,
    pub status: EquipmentStatus,
    pub image_url: String,
    /// Display hint for the image
    pub ai_hint: String,
}

/// Equipment with its live availability
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentAvailability {
    #[serde(flatten)]
    pub equipment: Equipment,
    /// Units not held by an active reservation right now
    pub available_count: u32,
    pub is_available: bool,
}

/// Create equipment request. New equipment always starts `Available`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: String,
    pub category: EquipmentCategory,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub total_quantity: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub image_url: Option<String>,
    #[validate(length(min = 2, message = "AI hint must be at least 2 characters long"))]
    pub ai_hint: String,
}

impl CreateEquipment {
    pub fn into_equipment(self, id: String) -> Equipment {
        Equipment {
            id,
            name: self.name,
            category: self.category,
            total_quantity: self.total_quantity,
            status: EquipmentStatus::Available,
            image_url: self
                .image_url
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            ai_hint: self.ai_hint,
        }
    }
}

/// Update equipment request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,
    pub category: Option<EquipmentCategory>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub total_quantity: Option<u32>,
    pub status: Option<EquipmentStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub image_url: Option<String>,
    #[validate(length(min = 2, message = "AI hint must be at least 2 characters long"))]
    pub ai_hint: Option<String>,
}

impl UpdateEquipment {
    pub fn apply(self, equipment: &mut Equipment) {
        if let Some(name) = self.name {
            equipment.name = name;
        }
        if let Some(category) = self.category {
            equipment.category = category;
        }
        if let Some(total_quantity) = self.total_quantity {
            equipment.total_quantity = total_quantity;
        }
        if let Some(status) = self.status {
            equipment.status = status;
        }
        if let Some(image_url) = self.image_url {
            equipment.image_url = image_url;
        }
        if let Some(ai_hint) = self.ai_hint {
            equipment.ai_hint = ai_hint;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        let status: EquipmentStatus = serde_json::from_value(json!("Partially Available")).unwrap();
        assert_eq!(status, EquipmentStatus::PartiallyAvailable);
        assert_eq!(
            serde_json::to_value(EquipmentStatus::Maintenance).unwrap(),
            json!("Maintenance")
        );
    }

    #[test]
    fn test_create_validation() {
        let req: CreateEquipment = serde_json::from_value(json!({
            "name": "Mic",
            "category": "Microphone",
            "totalQuantity": 0,
            "imageUrl": "not a url",
            "aiHint": "m"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("total_quantity"));
        assert!(fields.contains_key("image_url"));
        assert!(fields.contains_key("ai_hint"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_create_defaults() {
        let req: CreateEquipment = serde_json::from_value(json!({
            "name": "Zoom H6 Recorder",
            "category": "Other",
            "totalQuantity": 4,
            "imageUrl": "",
            "aiHint": "audio recorder"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        let equipment = req.into_equipment("e7".to_string());
        assert_eq!(equipment.status, EquipmentStatus::Available);
        assert_eq!(equipment.image_url, PLACEHOLDER_IMAGE_URL);
    }
}
