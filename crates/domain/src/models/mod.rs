//! Domain models for the barbershop.

pub mod appointment;
pub mod client;
pub mod common;
pub mod dashboard;
pub mod employee;
pub mod report;
pub mod service;

pub use appointment::{
    Appointment, AppointmentStatus, AvailabilityQuery, AvailabilityResponse,
    ListAppointmentsQuery, SaveAppointmentsRequest, UpsertAppointment,
};
pub use client::{Client, SaveClientsRequest, UpsertClient};
pub use common::{BulkSaveResponse, DeleteResponse, ListQuery};
pub use dashboard::{DashboardQuery, DashboardSummary};
pub use employee::{Employee, SaveEmployeesRequest, UpsertEmployee};
pub use report::{ReportLine, SalesReport, SalesReportQuery};
pub use service::{SaveServicesRequest, Service, UpsertService};
