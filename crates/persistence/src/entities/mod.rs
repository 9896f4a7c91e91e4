//! Database entity definitions.

pub mod appointment;
pub mod client;
pub mod employee;
pub mod service;

pub use appointment::{AppointmentEntity, AppointmentStatusDb};
pub use client::ClientEntity;
pub use employee::EmployeeEntity;
pub use service::ServiceEntity;
