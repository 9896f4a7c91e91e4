//! Repository implementations for database operations.

pub mod appointment;
pub mod client;
pub mod employee;
pub mod service;

pub use appointment::{AppointmentFilter, AppointmentRepository, AppointmentSaveError};
pub use client::ClientRepository;
pub use employee::EmployeeRepository;
pub use service::ServiceRepository;

/// Builds a `LIKE` pattern matching `term` anywhere, with `\` as the escape
/// character for literal `%` and `_`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
