//! Employee domain model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::dates::flexible_datetime_opt;
use validator::Validate;

use super::common::default_active;

/// A staff member who can be booked for appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Job title, e.g. "Barber".
    pub role: String,
    #[serde(with = "shared::dates::flexible_datetime")]
    pub hired_at: NaiveDateTime,
    pub salary: f64,
    pub active: bool,
}

/// Entry of an employee bulk upsert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertEmployee {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_optional_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Role must be at most 100 characters"))]
    pub role: String,

    #[serde(default, with = "flexible_datetime_opt")]
    pub hired_at: Option<NaiveDateTime>,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: f64,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// Request body for `POST /api/employees`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveEmployeesRequest {
    #[validate(nested)]
    pub employees: Vec<UpsertEmployee>,
}

impl From<Employee> for UpsertEmployee {
    fn from(e: Employee) -> Self {
        Self {
            id: Some(e.id),
            name: e.name,
            phone: e.phone,
            email: e.email,
            role: e.role,
            hired_at: Some(e.hired_at),
            salary: e.salary,
            active: e.active,
        }
    }
}
