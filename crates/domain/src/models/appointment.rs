//! Appointment domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shared::dates::{flexible_date, flexible_date_opt, flexible_datetime_opt};
use std::str::FromStr;
use validator::Validate;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an appointment in this state still occupies the employee's time.
    ///
    /// Completed and cancelled appointments never block a slot.
    pub fn blocks_calendar(&self) -> bool {
        !matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "in_progress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

/// A booking of one service, for one client, with one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub employee_id: i64,
    pub service_id: i64,
    #[serde(default, with = "flexible_date_opt")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_datetime_opt")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, with = "flexible_datetime_opt")]
    pub ends_at: Option<NaiveDateTime>,
    pub status: AppointmentStatus,
    pub notes: String,
    pub total_value: f64,
}

impl Appointment {
    /// Calendar day the appointment belongs to.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.scheduled_date
            .or_else(|| self.starts_at.map(|start| start.date()))
    }

    /// The `[start, end)` window, when both ends are known.
    pub fn occupied_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Entry of an appointment bulk upsert.
///
/// `ends_at` defaults to `starts_at` plus the service duration and
/// `total_value` defaults to the service price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertAppointment {
    pub id: Option<i64>,

    #[validate(range(min = 1, message = "client_id is required"))]
    pub client_id: i64,

    #[validate(range(min = 1, message = "employee_id is required"))]
    pub employee_id: i64,

    #[validate(range(min = 1, message = "service_id is required"))]
    pub service_id: i64,

    #[serde(default, with = "flexible_date_opt")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(default, with = "flexible_datetime_opt")]
    pub starts_at: Option<NaiveDateTime>,

    #[serde(default, with = "flexible_datetime_opt")]
    pub ends_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub status: AppointmentStatus,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Total value cannot be negative"))]
    pub total_value: Option<f64>,
}

/// Request body for `POST /api/appointments`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveAppointmentsRequest {
    #[validate(nested)]
    pub appointments: Vec<UpsertAppointment>,
}

impl From<Appointment> for UpsertAppointment {
    fn from(a: Appointment) -> Self {
        Self {
            id: Some(a.id),
            client_id: a.client_id,
            employee_id: a.employee_id,
            service_id: a.service_id,
            scheduled_date: a.scheduled_date,
            starts_at: a.starts_at,
            ends_at: a.ends_at,
            status: a.status,
            notes: a.notes,
            total_value: Some(a.total_value),
        }
    }
}

/// Filters for `GET /api/appointments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAppointmentsQuery {
    pub employee_id: Option<i64>,
    pub client_id: Option<i64>,
    #[serde(default, with = "flexible_date_opt")]
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

/// Query for `GET /api/availability`. One of `service_id` or
/// `duration_minutes` sets the slot length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub employee_id: i64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub service_id: Option<i64>,
    pub duration_minutes: Option<i32>,
}

/// Free start times for an employee on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub employee_id: i64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub duration_minutes: i32,
    pub slots: Vec<String>,
}
