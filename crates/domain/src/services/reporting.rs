//! Dashboard counters and sales report aggregation.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::errors::ReportError;
use crate::models::{
    Appointment, AppointmentStatus, DashboardSummary, Employee, ReportLine, SalesReport, Service,
};
use shared::validation::round_money;

/// Active record counts read straight from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveCounts {
    pub clients: i64,
    pub employees: i64,
    pub services: i64,
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(first);
    (first, last)
}

/// Builds the home screen counters for `date`.
///
/// `appointments` should cover at least the calendar month of `date`;
/// entries outside it are ignored.
pub fn build_dashboard(
    date: NaiveDate,
    counts: ActiveCounts,
    appointments: &[Appointment],
) -> DashboardSummary {
    let (month_start, month_end) = month_bounds(date);

    let appointments_today = appointments
        .iter()
        .filter(|a| a.calendar_date() == Some(date))
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .count() as i64;

    let monthly_revenue: f64 = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .filter(|a| {
            a.calendar_date()
                .is_some_and(|d| d >= month_start && d <= month_end)
        })
        .map(|a| a.total_value)
        .sum();

    DashboardSummary {
        date,
        active_clients: counts.clients,
        active_employees: counts.employees,
        active_services: counts.services,
        appointments_today,
        monthly_revenue: round_money(monthly_revenue),
    }
}

#[derive(Default)]
struct Tally {
    count: i64,
    revenue: f64,
}

fn into_lines(
    tallies: HashMap<i64, Tally>,
    names: &HashMap<i64, &str>,
    label: &str,
) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = tallies
        .into_iter()
        .map(|(id, tally)| ReportLine {
            id,
            name: names
                .get(&id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("{label} #{id}")),
            count: tally.count,
            revenue: round_money(tally.revenue),
        })
        .collect();
    lines.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    lines
}

/// Aggregates completed appointments scheduled within `[from, to]`.
///
/// Service and employee names are looked up in the given lists, which should
/// include inactive records so historical lines keep their names.
pub fn build_sales_report(
    from: NaiveDate,
    to: NaiveDate,
    appointments: &[Appointment],
    services: &[Service],
    employees: &[Employee],
    counts: ActiveCounts,
) -> Result<SalesReport, ReportError> {
    if from > to {
        return Err(ReportError::InvalidRange { from, to });
    }

    let completed: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .filter(|a| a.calendar_date().is_some_and(|d| d >= from && d <= to))
        .collect();

    let mut by_service: HashMap<i64, Tally> = HashMap::new();
    let mut by_employee: HashMap<i64, Tally> = HashMap::new();
    let mut total_revenue = 0.0;

    for appointment in &completed {
        total_revenue += appointment.total_value;

        let service = by_service.entry(appointment.service_id).or_default();
        service.count += 1;
        service.revenue += appointment.total_value;

        let employee = by_employee.entry(appointment.employee_id).or_default();
        employee.count += 1;
        employee.revenue += appointment.total_value;
    }

    let service_names: HashMap<i64, &str> =
        services.iter().map(|s| (s.id, s.name.as_str())).collect();
    let employee_names: HashMap<i64, &str> =
        employees.iter().map(|e| (e.id, e.name.as_str())).collect();

    Ok(SalesReport {
        from,
        to,
        total_appointments: completed.len() as i64,
        total_revenue: round_money(total_revenue),
        active_clients: counts.clients,
        active_employees: counts.employees,
        by_service: into_lines(by_service, &service_names, "Service"),
        by_employee: into_lines(by_employee, &employee_names, "Employee"),
    })
}
