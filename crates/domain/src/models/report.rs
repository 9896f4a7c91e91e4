//! Sales report models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::dates::flexible_date;

/// Query for `GET /api/reports/sales`. Both bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReportQuery {
    #[serde(with = "flexible_date")]
    pub from: NaiveDate,
    #[serde(with = "flexible_date")]
    pub to: NaiveDate,
}

/// Count and revenue for one service or one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub id: i64,
    pub name: String,
    pub count: i64,
    pub revenue: f64,
}

/// Aggregation of completed appointments over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    #[serde(with = "flexible_date")]
    pub from: NaiveDate,
    #[serde(with = "flexible_date")]
    pub to: NaiveDate,
    pub total_appointments: i64,
    pub total_revenue: f64,
    pub active_clients: i64,
    pub active_employees: i64,
    /// Sorted by count, highest first.
    pub by_service: Vec<ReportLine>,
    /// Sorted by count, highest first.
    pub by_employee: Vec<ReportLine>,
}
