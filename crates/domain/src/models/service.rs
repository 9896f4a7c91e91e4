//! Service catalog model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::default_active;

/// Default length of a service when none is given.
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

/// Longest bookable service (ten hours).
pub const MAX_DURATION_MINUTES: i32 = 600;

/// An item of the service menu (haircut, beard trim, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub active: bool,
}

fn default_duration() -> i32 {
    DEFAULT_DURATION_MINUTES
}

/// Entry of a service bulk upsert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertService {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[serde(default = "default_duration")]
    #[validate(range(
        min = 1,
        max = 600,
        message = "Duration must be between 1 and 600 minutes"
    ))]
    pub duration_minutes: i32,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// Request body for `POST /api/services`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveServicesRequest {
    #[validate(nested)]
    pub services: Vec<UpsertService>,
}

impl From<Service> for UpsertService {
    fn from(s: Service) -> Self {
        Self {
            id: Some(s.id),
            name: s.name,
            description: s.description,
            price: s.price,
            duration_minutes: s.duration_minutes,
            active: s.active,
        }
    }
}
