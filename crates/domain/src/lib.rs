//! Domain layer for the barbershop backend.
//!
//! This crate contains:
//! - Domain models (Client, Employee, Service, Appointment)
//! - Scheduling rules (slot availability, conflict detection)
//! - Dashboard and sales report aggregation
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
