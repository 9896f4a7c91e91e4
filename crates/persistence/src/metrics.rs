//! Query timing and pool gauges for the SQLite store.

use metrics::{gauge, histogram};
use sqlx::SqlitePool;
use std::time::Instant;

/// Histogram of repository query latency, labelled by query name.
pub const QUERY_DURATION_METRIC: &str = "barbershop_db_query_duration_seconds";

/// Measures one repository call.
///
/// ```ignore
/// let timer = QueryTimer::new("list_clients");
/// let rows = sqlx::query_as::<_, ClientEntity>(sql).fetch_all(&pool).await;
/// timer.record();
/// ```
///
/// Calls that bail out early with `?` are not recorded.
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time and returns it in seconds.
    pub fn record(self) -> f64 {
        let elapsed = self.start.elapsed().as_secs_f64();
        histogram!(QUERY_DURATION_METRIC, "query" => self.query).record(elapsed);
        elapsed
    }
}

/// Snapshot of connection usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolUsage {
    pub open: u32,
    pub idle: u32,
    pub max: u32,
}

impl PoolUsage {
    pub fn of(pool: &SqlitePool) -> Self {
        let open = pool.size();
        Self {
            open,
            idle: (pool.num_idle() as u32).min(open),
            max: pool.options().get_max_connections(),
        }
    }

    pub fn in_use(&self) -> u32 {
        self.open - self.idle
    }
}

/// Publishes pool gauges. Called on a timer by the server.
pub fn record_pool_metrics(pool: &SqlitePool) -> PoolUsage {
    let usage = PoolUsage::of(pool);
    gauge!("barbershop_db_connections_in_use").set(f64::from(usage.in_use()));
    gauge!("barbershop_db_connections_idle").set(f64::from(usage.idle));
    gauge!("barbershop_db_connections_max").set(f64::from(usage.max));
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;

    #[test]
    fn test_query_timer_keeps_name() {
        let timer = QueryTimer::new("list_clients");
        assert_eq!(timer.query, "list_clients");
        assert!(timer.record() >= 0.0);
    }

    #[tokio::test]
    async fn test_pool_usage_reflects_settings() {
        let pool = test_pool().await;
        let usage = record_pool_metrics(&pool);
        assert_eq!(usage.max, 1);
        assert!(usage.open <= usage.max);
        assert_eq!(usage.in_use() + usage.idle, usage.open);
    }
}
