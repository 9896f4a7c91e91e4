//! Client repository for database operations.

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::entities::ClientEntity;
use crate::metrics::QueryTimer;
use domain::models::UpsertClient;
use shared::dates::local_now;

const CLIENT_COLUMNS: &str = "id, name, phone, email, registered_at, notes, active";

/// Repository for client-related database operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List clients ordered by name, optionally including deactivated ones
    /// and filtering by a name, phone or email substring.
    pub async fn list(
        &self,
        include_inactive: bool,
        search: Option<&str>,
    ) -> Result<Vec<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_clients");
        let sql = format!(
            r#"
            SELECT {CLIENT_COLUMNS} FROM clients
            WHERE (?1 OR active = 1)
              AND (?2 IS NULL
                   OR name LIKE ?2 ESCAPE '\'
                   OR phone LIKE ?2 ESCAPE '\'
                   OR email LIKE ?2 ESCAPE '\')
            ORDER BY name COLLATE NOCASE, id
            "#
        );
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .bind(include_inactive)
            .bind(search.map(like_pattern))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a client by id, active or not.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_by_id");
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        let result = sqlx::query_as::<_, ClientEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert or overwrite every entry in one transaction.
    ///
    /// Entries whose id exists are updated; the rest are inserted with a new
    /// id. Returns the stored ids in request order.
    pub async fn upsert_many(&self, entries: &[UpsertClient]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("upsert_clients");
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let updated = match entry.id {
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE clients SET
                            name = ?2,
                            phone = ?3,
                            email = ?4,
                            registered_at = COALESCE(?5, registered_at),
                            notes = ?6,
                            active = ?7
                        WHERE id = ?1
                        "#,
                    )
                    .bind(id)
                    .bind(&entry.name)
                    .bind(&entry.phone)
                    .bind(&entry.email)
                    .bind(entry.registered_at)
                    .bind(&entry.notes)
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
                    INSERT INTO clients (name, phone, email, registered_at, notes, active)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(&entry.name)
                .bind(&entry.phone)
                .bind(&entry.email)
                .bind(entry.registered_at.unwrap_or_else(local_now))
                .bind(&entry.notes)
                .bind(entry.active)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
            };
            ids.push(id);
        }

        tx.commit().await?;
        timer.record();
        debug!(count = ids.len(), "Upserted clients");
        Ok(ids)
    }

    /// Soft delete. Returns false when the client does not exist.
    pub async fn deactivate(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_client");
        let result = sqlx::query("UPDATE clients SET active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Count active clients.
    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_clients");
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(count.0)
    }
}
