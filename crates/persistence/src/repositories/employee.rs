//! Employee repository for database operations.

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::entities::EmployeeEntity;
use crate::metrics::QueryTimer;
use domain::models::UpsertEmployee;
use shared::dates::local_now;
use shared::validation::round_money;

const EMPLOYEE_COLUMNS: &str = "id, name, phone, email, role, hired_at, salary, active";

/// Repository for employee-related database operations.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List employees ordered by name.
    pub async fn list(
        &self,
        include_inactive: bool,
        search: Option<&str>,
    ) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_employees");
        let sql = format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS} FROM employees
            WHERE (?1 OR active = 1)
              AND (?2 IS NULL
                   OR name LIKE ?2 ESCAPE '\'
                   OR phone LIKE ?2 ESCAPE '\'
                   OR email LIKE ?2 ESCAPE '\')
            ORDER BY name COLLATE NOCASE, id
            "#
        );
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .bind(include_inactive)
            .bind(search.map(like_pattern))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1");
        let result = sqlx::query_as::<_, EmployeeEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert or overwrite every entry in one transaction, returning ids in
    /// request order.
    pub async fn upsert_many(&self, entries: &[UpsertEmployee]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("upsert_employees");
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let salary = round_money(entry.salary);
            let updated = match entry.id {
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE employees SET
                            name = ?2,
                            phone = ?3,
                            email = ?4,
                            role = ?5,
                            hired_at = COALESCE(?6, hired_at),
                            salary = ?7,
                            active = ?8
                        WHERE id = ?1
                        "#,
                    )
                    .bind(id)
                    .bind(&entry.name)
                    .bind(&entry.phone)
                    .bind(&entry.email)
                    .bind(&entry.role)
                    .bind(entry.hired_at)
                    .bind(salary)
                    .bind(entry.active)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                        > 0
                }
                None => false,
            };

            let id = match entry.id {
                Some(id) if updated => id,
                _ => sqlx::query(
                    r#"
                    INSERT INTO employees (name, phone, email, role, hired_at, salary, active)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                )
                .bind(&entry.name)
                .bind(&entry.phone)
                .bind(&entry.email)
                .bind(&entry.role)
                .bind(entry.hired_at.unwrap_or_else(local_now))
                .bind(salary)
                .bind(entry.active)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
            };
            ids.push(id);
        }

        tx.commit().await?;
        timer.record();
        debug!(count = ids.len(), "Upserted employees");
        Ok(ids)
    }

    /// Soft delete. Appointments of the employee are left as they are.
    pub async fn deactivate(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_employee");
        let result = sqlx::query("UPDATE employees SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_employees");
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(count.0)
    }
}
