//! Domain error types.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Reasons an appointment cannot be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Time slot conflicts with appointment from {} to {}", .start.format("%H:%M"), .end.format("%H:%M"))]
    Conflict {
        appointment_id: i64,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Service duration must be a positive number of minutes")]
    InvalidDuration,

    #[error("Start time must be before end time")]
    InvalidTimeRange,

    #[error("A new appointment must last the service duration of {expected_minutes} minutes")]
    DurationMismatch { expected_minutes: i32 },

    #[error("Appointment must start on its scheduled date {0}")]
    DateMismatch(NaiveDate),

    #[error("Appointment must fit within business hours ({} to {})", .opening.format("%H:%M"), .closing.format("%H:%M"))]
    OutsideBusinessHours { opening: NaiveTime, closing: NaiveTime },

    #[error("Invalid business hours: {0}")]
    InvalidBusinessHours(String),
}

/// Invalid input for report aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Report start date {from} is after end date {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}
