//! Client domain model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::dates::flexible_datetime_opt;
use validator::Validate;

use super::common::default_active;

/// A barbershop customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(with = "shared::dates::flexible_datetime")]
    pub registered_at: NaiveDateTime,
    pub notes: String,
    pub active: bool,
}

/// Entry of a client bulk upsert. A known `id` overwrites that record whole,
/// anything else creates a new one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertClient {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_optional_email"))]
    pub email: String,

    /// Defaults to now for new clients; kept as-is for updates when omitted.
    #[serde(default, with = "flexible_datetime_opt")]
    pub registered_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub notes: String,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// Request body for `POST /api/clients`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveClientsRequest {
    #[validate(nested)]
    pub clients: Vec<UpsertClient>,
}

impl From<Client> for UpsertClient {
    fn from(c: Client) -> Self {
        Self {
            id: Some(c.id),
            name: c.name,
            phone: c.phone,
            email: c.email,
            registered_at: Some(c.registered_at),
            notes: c.notes,
            active: c.active,
        }
    }
}
