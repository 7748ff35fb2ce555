//! Reservation model, status lifecycle and reservation windows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Kind of item a reservation holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Equipment,
    Room,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Equipment => write!(f, "equipment"),
            ItemType::Room => write!(f, "room"),
        }
    }
}

/// Reservation status.
///
/// Transitions are driven by admin actions only:
/// `Pending -> Active -> Completed` and `Pending -> Declined`.
/// `Overdue` is a valid stored value but nothing moves a reservation into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReservationStatus {
    Pending,
    Active,
    Completed,
    Overdue,
    Declined,
}

impl ReservationStatus {
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Declined) | (Active, Completed)
        )
    }

    /// Statuses that hold the item (shown on calendars)
    pub fn is_holding(&self) -> bool {
        matches!(self, ReservationStatus::Active | ReservationStatus::Pending)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Returns `None` unless `end > start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub item_type: ItemType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn window(&self) -> Window {
        Window {
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_for(&self, item_id: &str, item_type: ItemType) -> bool {
        self.item_id == item_id && self.item_type == item_type
    }
}

/// Reservation request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    pub item_id: String,
    pub item_type: ItemType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub purpose: Option<String>,
}

/// Reservation listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    pub user_id: Option<String>,
    pub item_id: Option<String>,
    pub item_type: Option<ItemType>,
}

impl ReservationQuery {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.status.map_or(true, |s| reservation.status == s)
            && self.user_id.as_deref().map_or(true, |u| reservation.user_id == u)
            && self.item_id.as_deref().map_or(true, |i| reservation.item_id == i)
            && self.item_type.map_or(true, |t| reservation.item_type == t)
    }
}

/// Reservation joined with display names
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub item_name: String,
    pub user_name: String,
}

/// Availability lookup. With `start` and `end` the window is checked as well;
/// otherwise only the instant `at` (default: now) is.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub item_id: String,
    pub item_type: ItemType,
    pub at: Option<DateTime<Utc>>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Availability of one item
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub item_id: String,
    pub item_type: ItemType,
    /// Instant the availability was evaluated at
    pub at: DateTime<Utc>,
    /// Whether at least one unit (or the room) is free at `at`
    pub available: bool,
    /// Free units at `at`, equipment only
    pub available_count: Option<u32>,
    /// Active or Pending reservations overlapping the requested window
    pub conflicts: Vec<Reservation>,
}
