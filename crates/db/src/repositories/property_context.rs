use async_trait::async_trait;
use sqlx::Row;

use mtr_core::config::{is_sql_identifier, DatabaseConfig};
use mtr_core::domain::property::{group_rows, PropertyRecord, PropertyRow};
use mtr_core::errors::SourceError;
use mtr_core::source::PropertySource;

use super::RepositoryError;
use crate::{connect_lazy_with_settings, DbPool};

/// Listings read from the key/value property table.
///
/// Each fetch re-reads every row; nothing is cached between calls.
pub struct TableSource {
    pool: Option<DbPool>,
    table: String,
}

impl TableSource {
    pub fn new(pool: DbPool, table: impl Into<String>) -> Self {
        Self { pool: Some(pool), table: table.into() }
    }

    /// A source with no database behind it; every fetch reports `NotConfigured`.
    pub fn unconfigured(table: impl Into<String>) -> Self {
        Self { pool: None, table: table.into() }
    }

    /// Builds the source from configuration without touching the network.
    pub fn from_config(database: &DatabaseConfig) -> Result<Self, RepositoryError> {
        match database.exposed_url() {
            Some(url) => {
                let pool = connect_lazy_with_settings(
                    url,
                    database.max_connections,
                    database.timeout_secs,
                )?;
                Ok(Self::new(pool, database.table.clone()))
            }
            None => Ok(Self::unconfigured(database.table.clone())),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> Option<&DbPool> {
        self.pool.as_ref()
    }

    pub async fn fetch_rows(&self, pool: &DbPool) -> Result<Vec<PropertyRow>, RepositoryError> {
        if !is_sql_identifier(&self.table) {
            return Err(RepositoryError::Decode(format!(
                "refusing to query table `{}`: not a plain identifier",
                self.table
            )));
        }

        let sql = format!(
            "SELECT \"propertyId\", \"key\", \"value\" FROM \"{}\" ORDER BY \"propertyId\"",
            self.table
        );
        let rows = sqlx::query(&sql).fetch_all(pool).await?;

        rows.iter()
            .map(|row| {
                let property_id: String =
                    row.try_get(0).map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let key: String =
                    row.try_get(1).map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let value: String =
                    row.try_get(2).map_err(|e| RepositoryError::Decode(e.to_string()))?;
                Ok(PropertyRow { property_id, key, value })
            })
            .collect()
    }
}

#[async_trait]
impl PropertySource for TableSource {
    fn kind(&self) -> &'static str {
        "table"
    }

    async fn load(&self) -> Result<Vec<PropertyRecord>, SourceError> {
        let Some(pool) = self.pool.as_ref() else {
            return Err(SourceError::NotConfigured(
                "no database URL configured (set MTR_DATABASE_URL)".to_string(),
            ));
        };

        let rows =
            self.fetch_rows(pool).await.map_err(|error| SourceError::Backend(error.to_string()))?;
        Ok(group_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use mtr_core::errors::SourceError;
    use mtr_core::source::PropertySource;

    use super::TableSource;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn migrated_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    async fn insert(pool: &DbPool, id: &str, property_id: &str, key: &str, value: &str) {
        sqlx::query(
            "INSERT INTO \"PropertyContext\" (\"id\", \"propertyId\", \"key\", \"value\") \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(property_id)
        .bind(key)
        .bind(value)
        .execute(pool)
        .await
        .expect("insert row");
    }

    #[tokio::test]
    async fn table_rows_are_grouped_into_records() {
        let pool = migrated_pool().await;
        insert(&pool, "r1", "b_2", "_name", "Second").await;
        insert(&pool, "r2", "a_1", "_name", "First").await;
        insert(&pool, "r3", "a_1", "_city", "Boulder").await;
        insert(&pool, "r4", "a_1", "wifi_info", "5GHz network").await;

        let source = TableSource::new(pool.clone(), "PropertyContext");
        let records = source.load().await.expect("load records");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.0, "a_1");
        assert_eq!(records[0].fields.name(), Some("First"));
        assert_eq!(records[0].fields.city(), Some("Boulder"));
        assert_eq!(
            records[0].extra_context.get("wifi_info").map(String::as_str),
            Some("5GHz network")
        );
        assert_eq!(records[1].fields.name(), Some("Second"));

        pool.close().await;
    }

    #[tokio::test]
    async fn unconfigured_source_fails_soft() {
        let source = TableSource::unconfigured("PropertyContext");

        assert!(matches!(source.load().await, Err(SourceError::NotConfigured(_))));
        assert!(source.fetch_all().await.is_empty());
    }

    #[tokio::test]
    async fn missing_table_fails_soft() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool");
        let source = TableSource::new(pool.clone(), "PropertyContext");

        assert!(matches!(source.load().await, Err(SourceError::Backend(_))));
        assert!(source.fetch_all().await.is_empty());

        pool.close().await;
    }

    #[tokio::test]
    async fn closed_pool_fails_soft() {
        let pool = migrated_pool().await;
        pool.close().await;

        let source = TableSource::new(pool, "PropertyContext");
        assert!(source.fetch_all().await.is_empty());
    }

    #[tokio::test]
    async fn unsafe_table_name_is_never_queried() {
        let pool = migrated_pool().await;
        let source = TableSource::new(pool.clone(), "PropertyContext; DROP TABLE x");

        assert!(matches!(source.load().await, Err(SourceError::Backend(_))));

        pool.close().await;
    }
}
