//! Domain services for the barbershop.
//!
//! Services contain business logic that operates on domain models.

pub mod reporting;
pub mod scheduling;

pub use reporting::{build_dashboard, build_sales_report, month_bounds, ActiveCounts};
pub use scheduling::{
    available_slots, find_conflict, format_slots, overlaps, resolve_defaults, validate_booking,
    validate_no_conflict, BusinessHours, ProposedAppointment,
};
