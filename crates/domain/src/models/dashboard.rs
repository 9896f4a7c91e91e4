//! Dashboard counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::dates::{flexible_date, flexible_date_opt};

/// Query for `GET /api/dashboard`. The date defaults to today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, with = "flexible_date_opt")]
    pub date: Option<NaiveDate>,
}

/// Headline numbers shown on the home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub active_clients: i64,
    pub active_employees: i64,
    pub active_services: i64,
    /// Appointments on `date` that were not cancelled.
    pub appointments_today: i64,
    /// Revenue of completed appointments in the calendar month of `date`.
    pub monthly_revenue: f64,
}
