//! HTTP route handlers.

pub mod appointments;
pub mod availability;
pub mod clients;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod reports;
pub mod services;
