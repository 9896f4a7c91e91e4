//! Slot availability and booking conflict rules.
//!
//! All times are naive wall-clock values for the shop's local time zone.
//! An employee is busy over `[starts_at, ends_at)` of every appointment on the
//! same calendar date whose status still blocks the calendar. Two windows
//! overlap when `a_start < b_end && a_end > b_start`, so back-to-back bookings
//! are allowed.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::errors::SchedulingError;
use crate::models::{Appointment, AppointmentStatus, Service, UpsertAppointment};
use shared::validation::round_money;

/// Opening hours and the grid candidate start times are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    opening: NaiveTime,
    closing: NaiveTime,
    slot_minutes: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            closing: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_minutes: 30,
        }
    }
}

impl BusinessHours {
    pub fn new(
        opening: NaiveTime,
        closing: NaiveTime,
        slot_minutes: u32,
    ) -> Result<Self, SchedulingError> {
        if opening >= closing {
            return Err(SchedulingError::InvalidBusinessHours(format!(
                "opening time {} must be before closing time {}",
                opening.format("%H:%M"),
                closing.format("%H:%M")
            )));
        }
        if slot_minutes == 0 {
            return Err(SchedulingError::InvalidBusinessHours(
                "slot size must be at least one minute".to_string(),
            ));
        }
        Ok(Self {
            opening,
            closing,
            slot_minutes,
        })
    }

    pub fn opening(&self) -> NaiveTime {
        self.opening
    }

    pub fn closing(&self) -> NaiveTime {
        self.closing
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Whether `[start, end)` lies inside opening hours of `start`'s day.
    pub fn contains(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let day = start.date();
        start >= day.and_time(self.opening) && end <= day.and_time(self.closing)
    }
}

/// Half-open interval overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// A blocking booking on the employee's calendar.
#[derive(Debug, Clone, Copy)]
struct BusyWindow {
    appointment_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

/// Busy windows of `employee_id` on `date`, earliest first, skipping
/// `exclude_id` and anything without both a start and an end.
fn busy_windows(
    employee_id: i64,
    date: NaiveDate,
    appointments: &[Appointment],
    exclude_id: Option<i64>,
) -> Vec<BusyWindow> {
    let mut windows: Vec<BusyWindow> = appointments
        .iter()
        .filter(|a| a.employee_id == employee_id)
        .filter(|a| a.status.blocks_calendar())
        .filter(|a| Some(a.id) != exclude_id)
        .filter(|a| a.calendar_date() == Some(date))
        .filter_map(|a| {
            a.occupied_window().map(|(start, end)| BusyWindow {
                appointment_id: a.id,
                start,
                end,
            })
        })
        .collect();
    windows.sort_by_key(|w| (w.start, w.appointment_id));
    windows
}

/// Start times on the grid where a `duration_minutes` booking fits.
///
/// Candidates run from opening time while `start < closing`; a candidate is
/// dropped when it would end after closing or overlaps a busy window.
pub fn available_slots(
    hours: &BusinessHours,
    employee_id: i64,
    date: NaiveDate,
    duration_minutes: i32,
    appointments: &[Appointment],
) -> Result<Vec<NaiveTime>, SchedulingError> {
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidDuration);
    }

    let busy = busy_windows(employee_id, date, appointments, None);
    let duration = Duration::minutes(i64::from(duration_minutes));
    let step = Duration::minutes(i64::from(hours.slot_minutes));
    let closing = date.and_time(hours.closing);

    let mut slots = Vec::new();
    let mut start = date.and_time(hours.opening);
    while start < closing {
        let end = start
            .checked_add_signed(duration)
            .ok_or(SchedulingError::InvalidDuration)?;
        if end <= closing && !busy.iter().any(|w| overlaps(start, end, w.start, w.end)) {
            slots.push(start.time());
        }
        match start.checked_add_signed(step) {
            Some(next) => start = next,
            None => break,
        }
    }

    debug!(
        employee_id,
        %date,
        duration_minutes,
        busy = busy.len(),
        free = slots.len(),
        "Computed availability"
    );
    Ok(slots)
}

/// Formats slot start times as `HH:MM`.
pub fn format_slots(slots: &[NaiveTime]) -> Vec<String> {
    slots
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect()
}

/// The calendar-relevant part of a booking about to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedAppointment {
    /// Set when editing, so the stored copy does not conflict with itself.
    pub id: Option<i64>,
    pub employee_id: i64,
    pub scheduled_date: Option<NaiveDate>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub status: AppointmentStatus,
}

impl ProposedAppointment {
    fn calendar_date(&self) -> Option<NaiveDate> {
        self.scheduled_date
            .or_else(|| self.starts_at.map(|start| start.date()))
    }

    fn window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

impl From<&UpsertAppointment> for ProposedAppointment {
    fn from(entry: &UpsertAppointment) -> Self {
        Self {
            id: entry.id,
            employee_id: entry.employee_id,
            scheduled_date: entry.scheduled_date,
            starts_at: entry.starts_at,
            ends_at: entry.ends_at,
            status: entry.status,
        }
    }
}

/// Earliest existing appointment that overlaps the proposal.
///
/// Proposals that are cancelled, completed or lack a start or end never
/// conflict.
pub fn find_conflict<'a>(
    proposed: &ProposedAppointment,
    existing: &'a [Appointment],
) -> Option<&'a Appointment> {
    if !proposed.status.blocks_calendar() {
        return None;
    }
    let (start, end) = proposed.window()?;
    let date = proposed.calendar_date()?;

    let hit = busy_windows(proposed.employee_id, date, existing, proposed.id)
        .into_iter()
        .find(|w| overlaps(start, end, w.start, w.end))?;
    existing.iter().find(|a| a.id == hit.appointment_id)
}

/// Rejects the proposal when it overlaps another active booking.
pub fn validate_no_conflict(
    proposed: &ProposedAppointment,
    existing: &[Appointment],
) -> Result<(), SchedulingError> {
    let conflict = find_conflict(proposed, existing)
        .and_then(|hit| hit.occupied_window().map(|window| (hit.id, window)));
    match conflict {
        Some((appointment_id, (start, end))) => Err(SchedulingError::Conflict {
            appointment_id,
            start: start.time(),
            end: end.time(),
        }),
        None => Ok(()),
    }
}

/// End of a booking that starts at `start` and lasts `minutes`.
fn end_after(start: NaiveDateTime, minutes: i32) -> Result<NaiveDateTime, SchedulingError> {
    if minutes <= 0 {
        return Err(SchedulingError::InvalidDuration);
    }
    start
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
        .ok_or(SchedulingError::InvalidDuration)
}

/// Fills the service-derived defaults of an upsert entry and checks its
/// time fields.
///
/// A missing `ends_at` becomes `starts_at` plus the service duration, a
/// missing `total_value` becomes the service price and a missing
/// `scheduled_date` is taken from `starts_at`. A new booking (`is_new`) that
/// carries its own `ends_at` must last exactly the service duration; edits
/// of stored bookings may change the length freely.
pub fn resolve_defaults(
    entry: &UpsertAppointment,
    service: &Service,
    is_new: bool,
) -> Result<UpsertAppointment, SchedulingError> {
    let mut resolved = entry.clone();

    if let Some(start) = resolved.starts_at {
        match resolved.ends_at {
            None => resolved.ends_at = Some(end_after(start, service.duration_minutes)?),
            Some(end) if is_new && end > start => {
                if end != end_after(start, service.duration_minutes)? {
                    return Err(SchedulingError::DurationMismatch {
                        expected_minutes: service.duration_minutes,
                    });
                }
            }
            Some(_) => {}
        }
    }

    if let (Some(start), Some(end)) = (resolved.starts_at, resolved.ends_at) {
        if start >= end {
            return Err(SchedulingError::InvalidTimeRange);
        }
    }

    match (resolved.scheduled_date, resolved.starts_at) {
        (None, Some(start)) => resolved.scheduled_date = Some(start.date()),
        (Some(date), Some(start)) if start.date() != date => {
            return Err(SchedulingError::DateMismatch(date));
        }
        _ => {}
    }

    resolved.total_value = Some(round_money(resolved.total_value.unwrap_or(service.price)));
    Ok(resolved)
}

/// Checks a resolved entry against the employee's calendar for that day.
///
/// `previous` is the stored version when editing. Business hours are only
/// enforced when the booking is new or its window or employee changed, so
/// status and notes edits on legacy out-of-hours rows still go through.
pub fn validate_booking(
    hours: &BusinessHours,
    proposed: &ProposedAppointment,
    previous: Option<&Appointment>,
    existing: &[Appointment],
) -> Result<(), SchedulingError> {
    if !proposed.status.blocks_calendar() {
        return Ok(());
    }
    let Some((start, end)) = proposed.window() else {
        return Ok(());
    };

    let moved = match previous {
        Some(prev) => {
            prev.employee_id != proposed.employee_id
                || prev.occupied_window() != Some((start, end))
        }
        None => true,
    };
    if moved && !hours.contains(start, end) {
        return Err(SchedulingError::OutsideBusinessHours {
            opening: hours.opening,
            closing: hours.closing,
        });
    }

    validate_no_conflict(proposed, existing)
}
