//! Room model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{empty_string_as_none, PLACEHOLDER_IMAGE_URL};

/// Bookable room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    /// Free-text labels of the fixtures in the room (not equipment ids)
    pub equipment: Vec<String>,
    pub image_url: String,
    pub ai_hint: String,
}

/// Room with its live availability
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    #[serde(flatten)]
    pub room: Room,
    /// False while an active reservation covers the current instant
    pub is_available: bool,
}

/// Equipment labels, given either as a list or as one comma separated string
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EquipmentLabels {
    List(Vec<String>),
    Csv(String),
}

impl EquipmentLabels {
    /// Trimmed, non-empty labels in input order
    pub fn into_labels(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            EquipmentLabels::List(list) => list,
            EquipmentLabels::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect()
    }
}

/// Create room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    pub equipment: EquipmentLabels,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub image_url: Option<String>,
    #[validate(length(min = 2, message = "AI hint must be at least 2 characters long"))]
    pub ai_hint: String,
}

impl CreateRoom {
    pub fn into_room(self, id: String, equipment: Vec<String>) -> Room {
        Room {
            id,
            name: self.name,
            capacity: self.capacity,
            equipment,
            image_url: self
                .image_url
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            ai_hint: self.ai_hint,
        }
    }
}

/// Update room request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<u32>,
    pub equipment: Option<EquipmentLabels>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub image_url: Option<String>,
    #[validate(length(min = 2, message = "AI hint must be at least 2 characters long"))]
    pub ai_hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels_from_csv() {
        let labels: EquipmentLabels =
            serde_json::from_value(json!("Projector,  Whiteboard , ,Podium")).unwrap();
        assert_eq!(labels.into_labels(), vec!["Projector", "Whiteboard", "Podium"]);
    }

    #[test]
    fn test_labels_from_list() {
        let labels: EquipmentLabels =
            serde_json::from_value(json!([" Green Screen", ""])).unwrap();
        assert_eq!(labels.into_labels(), vec!["Green Screen"]);
    }

    #[test]
    fn test_create_validation() {
        let req: CreateRoom = serde_json::from_value(json!({
            "name": "AV",
            "capacity": 0,
            "equipment": "Whiteboard",
            "aiHint": "seminar room"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("capacity"));
    }
}
