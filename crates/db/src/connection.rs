use std::time::Duration;

use sqlx::any::AnyPoolOptions;

/// Pool over whichever backend the URL names (`postgres://` in production, `sqlite:` locally).
pub type DbPool = sqlx::AnyPool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    pool_options(max_connections, timeout_secs).connect(database_url).await
}

/// Builds a pool that opens its first connection on first use.
///
/// A bad or unreachable database therefore surfaces on the first query rather
/// than at startup.
pub fn connect_lazy_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    pool_options(max_connections, timeout_secs).connect_lazy(database_url)
}

fn pool_options(max_connections: u32, timeout_secs: u64) -> AnyPoolOptions {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
}

#[cfg(test)]
mod tests {
    use super::{connect_lazy_with_settings, connect_with_settings};

    #[tokio::test]
    async fn sqlite_memory_pool_answers_queries() {
        let pool =
            connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");

        let value: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.expect("select 1");
        assert_eq!(value, 1);

        pool.close().await;
    }

    #[tokio::test]
    async fn lazy_pool_defers_connection_errors_to_first_query() {
        let pool = connect_lazy_with_settings("postgres://nobody@127.0.0.1:1/none", 1, 1)
            .expect("lazy pool should build without connecting");

        let result = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool).await;
        assert!(result.is_err());
    }
}
