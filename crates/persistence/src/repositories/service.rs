//! Service catalog repository.

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::entities::ServiceEntity;
use crate::metrics::QueryTimer;
use domain::models::UpsertService;
use shared::validation::round_money;

pub(crate) const SERVICE_COLUMNS: &str = "id, name, description, price, duration_minutes, active";

/// Repository for service catalog operations.
#[derive(Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List services ordered by name. The search term matches name or
    /// description.
    pub async fn list(
        &self,
        include_inactive: bool,
        search: Option<&str>,
    ) -> Result<Vec<ServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_services");
        let sql = format!(
            r#"
            SELECT {SERVICE_COLUMNS} FROM services
            WHERE (?1 OR active = 1)
              AND (?2 IS NULL
                   OR name LIKE ?2 ESCAPE '\'
                   OR description LIKE ?2 ESCAPE '\')
            ORDER BY name COLLATE NOCASE, id
            "#
        );
        let result = sqlx::query_as::<_, ServiceEntity>(&sql)
            .bind(include_inactive)
            .bind(search.map(like_pattern))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_service_by_id");
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1");
        let result = sqlx::query_as::<_, ServiceEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert or overwrite every entry in one transaction, returning ids in
    /// request order. Prices are stored rounded to cents.
    pub async fn upsert_many(&self, entries: &[UpsertService]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("upsert_services");
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let price = round_money(entry.price);
            let updated = match entry.id {
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE services SET
                            name = ?2,
                            description = ?3,
                            price = ?4,
                            duration_minutes = ?5,
                            active = ?6
                        WHERE id = ?1
                        "#,
                    )
                    .bind(id)
                    .bind(&entry.name)
                    .bind(&entry.description)
                    .bind(price)
                    .bind(entry.duration_minutes)
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
                    INSERT INTO services (name, description, price, duration_minutes, active)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(&entry.name)
                .bind(&entry.description)
                .bind(price)
                .bind(entry.duration_minutes)
                .bind(entry.active)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
            };
            ids.push(id);
        }

        tx.commit().await?;
        timer.record();
        debug!(count = ids.len(), "Upserted services");
        Ok(ids)
    }

    /// Soft delete, so past appointments keep their service.
    pub async fn deactivate(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_service");
        let result = sqlx::query("UPDATE services SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_services");
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(count.0)
    }
}
