//! Appointment entity (database row mapping).

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use domain::models::{Appointment, AppointmentStatus};

/// Database enum for appointment status, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
pub enum AppointmentStatusDb {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl From<AppointmentStatusDb> for AppointmentStatus {
    fn from(db: AppointmentStatusDb) -> Self {
        match db {
            AppointmentStatusDb::Scheduled => AppointmentStatus::Scheduled,
            AppointmentStatusDb::Confirmed => AppointmentStatus::Confirmed,
            AppointmentStatusDb::InProgress => AppointmentStatus::InProgress,
            AppointmentStatusDb::Completed => AppointmentStatus::Completed,
            AppointmentStatusDb::Cancelled => AppointmentStatus::Cancelled,
        }
    }
}

impl From<AppointmentStatus> for AppointmentStatusDb {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Scheduled => AppointmentStatusDb::Scheduled,
            AppointmentStatus::Confirmed => AppointmentStatusDb::Confirmed,
            AppointmentStatus::InProgress => AppointmentStatusDb::InProgress,
            AppointmentStatus::Completed => AppointmentStatusDb::Completed,
            AppointmentStatus::Cancelled => AppointmentStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the appointments table.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentEntity {
    pub id: i64,
    pub client_id: i64,
    pub employee_id: i64,
    pub service_id: i64,
    pub scheduled_date: Option<NaiveDate>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub status: AppointmentStatusDb,
    pub notes: String,
    pub total_value: f64,
}

impl From<AppointmentEntity> for Appointment {
    fn from(entity: AppointmentEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            employee_id: entity.employee_id,
            service_id: entity.service_id,
            scheduled_date: entity.scheduled_date,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            status: entity.status.into(),
            notes: entity.notes,
            total_value: entity.total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        for status in AppointmentStatus::ALL {
            let db: AppointmentStatusDb = status.into();
            assert_eq!(AppointmentStatus::from(db), status);
        }
    }

    #[test]
    fn test_appointment_entity_to_domain() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let entity = AppointmentEntity {
            id: 3,
            client_id: 1,
            employee_id: 2,
            service_id: 4,
            scheduled_date: Some(day),
            starts_at: day.and_hms_opt(9, 0, 0),
            ends_at: day.and_hms_opt(9, 30, 0),
            status: AppointmentStatusDb::InProgress,
            notes: String::new(),
            total_value: 45.0,
        };
        let appointment: Appointment = entity.into();
        assert_eq!(appointment.status, AppointmentStatus::InProgress);
        assert_eq!(appointment.calendar_date(), Some(day));
        assert_eq!(appointment.total_value, 45.0);
    }
}
