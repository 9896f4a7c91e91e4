//! Database connection pool management.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Whether the URL points at a private in-memory database.
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Creates the parent directory of a file-backed SQLite URL.
pub fn ensure_sqlite_dir(url: &str) -> std::io::Result<()> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || is_in_memory(path) {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Creates a SQLite connection pool with foreign keys enforced.
///
/// An in-memory database lives inside a single connection, so the pool is
/// pinned to one connection that is never recycled.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    ensure_sqlite_dir(&config.url)?;

    let in_memory = is_in_memory(&config.url);
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.connect_timeout_secs));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await?;

    info!(url = %config.url, in_memory, "Database pool created");
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/barbershop.db"));
    }

    #[test]
    fn test_ensure_sqlite_dir_ignores_memory_and_other_schemes() {
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
        assert!(ensure_sqlite_dir("postgres://localhost/db").is_ok());
    }

    #[test]
    fn test_ensure_sqlite_dir_creates_parent() {
        let dir = std::env::temp_dir().join(format!("barbershop-db-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/app.db?mode=rwc", dir.display());
        ensure_sqlite_dir(&url).unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_create_pool_in_memory_runs_migrations() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
        };
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
