//! Appointment repository and the transactional booking pipeline.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

use super::service::SERVICE_COLUMNS;
use crate::entities::{AppointmentEntity, AppointmentStatusDb, ServiceEntity};
use crate::metrics::QueryTimer;
use domain::errors::SchedulingError;
use domain::models::{Appointment, AppointmentStatus, Service, UpsertAppointment};
use domain::services::scheduling::{
    resolve_defaults, validate_booking, BusinessHours, ProposedAppointment,
};

const APPOINTMENT_COLUMNS: &str = "id, client_id, employee_id, service_id, scheduled_date, \
     starts_at, ends_at, status, notes, total_value";

/// Calendar day of an appointment row, falling back to its start time.
const DAY_EXPR: &str = "COALESCE(scheduled_date, date(starts_at))";

/// Optional filters for listing appointments. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub employee_id: Option<i64>,
    pub client_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

/// Why a booking batch was not stored.
#[derive(Debug, Error)]
pub enum AppointmentSaveError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Service {0} not found")]
    ServiceNotFound(i64),

    /// Entry `index` of the batch broke a scheduling rule.
    #[error("{source}")]
    Rejected {
        index: usize,
        #[source]
        source: SchedulingError,
    },
}

/// Repository for appointment-related database operations.
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List appointments matching the filter, in calendar order.
    pub async fn list(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_appointments");
        let sql = format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS} FROM appointments
            WHERE (?1 IS NULL OR employee_id = ?1)
              AND (?2 IS NULL OR client_id = ?2)
              AND (?3 IS NULL OR {DAY_EXPR} = ?3)
              AND (?4 IS NULL OR {DAY_EXPR} >= ?4)
              AND (?5 IS NULL OR {DAY_EXPR} <= ?5)
              AND (?6 IS NULL OR status = ?6)
            ORDER BY {DAY_EXPR}, starts_at, id
            "#
        );
        let result = sqlx::query_as::<_, AppointmentEntity>(&sql)
            .bind(filter.employee_id)
            .bind(filter.client_id)
            .bind(filter.date)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.status.map(AppointmentStatusDb::from))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_appointment_by_id");
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
        let result = sqlx::query_as::<_, AppointmentEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Appointments of one employee on one day, read through `conn` so an
    /// open transaction sees its own earlier writes.
    async fn employee_day(
        conn: &mut SqliteConnection,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS} FROM appointments
            WHERE employee_id = ?1 AND {DAY_EXPR} = ?2
            ORDER BY starts_at, id
            "#
        );
        let rows = sqlx::query_as::<_, AppointmentEntity>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn find_in(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
        let row = sqlx::query_as::<_, AppointmentEntity>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(Appointment::from))
    }

    async fn service_in(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Service>, sqlx::Error> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1");
        let row = sqlx::query_as::<_, ServiceEntity>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(Service::from))
    }

    /// Validate and store a batch of bookings atomically.
    ///
    /// Each entry gets its service defaults, then is checked against the
    /// employee's day as currently seen by the transaction, so earlier
    /// entries of the same batch count as existing bookings. The first
    /// failure rolls the whole batch back. Callers serialize batches with
    /// a write lock; this method does not lock on its own.
    pub async fn save_batch(
        &self,
        entries: &[UpsertAppointment],
        hours: &BusinessHours,
    ) -> Result<Vec<i64>, AppointmentSaveError> {
        let timer = QueryTimer::new("save_appointments");
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let service = Self::service_in(&mut *tx, entry.service_id)
                .await?
                .ok_or(AppointmentSaveError::ServiceNotFound(entry.service_id))?;

            let previous = match entry.id {
                Some(id) => Self::find_in(&mut *tx, id).await?,
                None => None,
            };

            let resolved = resolve_defaults(entry, &service, previous.is_none())
                .map_err(|source| AppointmentSaveError::Rejected { index, source })?;

            let mut proposed = ProposedAppointment::from(&resolved);
            proposed.id = previous.as_ref().map(|p| p.id);

            let existing = match resolved.scheduled_date {
                Some(date) => Self::employee_day(&mut *tx, resolved.employee_id, date).await?,
                None => Vec::new(),
            };

            validate_booking(hours, &proposed, previous.as_ref(), &existing)
                .map_err(|source| AppointmentSaveError::Rejected { index, source })?;

            let status = AppointmentStatusDb::from(resolved.status);
            let total_value = resolved.total_value.unwrap_or(service.price);

            let id = match previous {
                Some(prev) => {
                    sqlx::query(
                        r#"
                        UPDATE appointments SET
                            client_id = ?2,
                            employee_id = ?3,
                            service_id = ?4,
                            scheduled_date = ?5,
                            starts_at = ?6,
                            ends_at = ?7,
                            status = ?8,
                            notes = ?9,
                            total_value = ?10
                        WHERE id = ?1
                        "#,
                    )
                    .bind(prev.id)
                    .bind(resolved.client_id)
                    .bind(resolved.employee_id)
                    .bind(resolved.service_id)
                    .bind(resolved.scheduled_date)
                    .bind(resolved.starts_at)
                    .bind(resolved.ends_at)
                    .bind(status)
                    .bind(&resolved.notes)
                    .bind(total_value)
                    .execute(&mut *tx)
                    .await?;
                    prev.id
                }
                None => sqlx::query(
                    r#"
                    INSERT INTO appointments (client_id, employee_id, service_id, scheduled_date,
                                              starts_at, ends_at, status, notes, total_value)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(resolved.client_id)
                .bind(resolved.employee_id)
                .bind(resolved.service_id)
                .bind(resolved.scheduled_date)
                .bind(resolved.starts_at)
                .bind(resolved.ends_at)
                .bind(status)
                .bind(&resolved.notes)
                .bind(total_value)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
            };

            debug!(
                appointment_id = id,
                employee_id = resolved.employee_id,
                status = %resolved.status,
                "Appointment staged"
            );
            ids.push(id);
        }

        tx.commit().await?;
        timer.record();
        info!(count = ids.len(), "Appointments saved");
        Ok(ids)
    }

    /// Hard delete. Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_appointment");
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
