use mtr_core::config::is_sql_identifier;
use mtr_core::domain::property::PropertyRecord;
use tracing::{debug, info};
use uuid::Uuid;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Outcome of writing listings into the property table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub updated: usize,
    pub property_ids: Vec<String>,
}

impl SeedResult {
    pub fn summary(&self) -> String {
        format!(
            "Seeded {} properties ({}): inserted {} new entries, updated {} existing entries",
            self.property_ids.len(),
            self.property_ids.join(", "),
            self.inserted,
            self.updated
        )
    }
}

/// Upserts listings as marker-prefixed key/value rows.
///
/// Rows are keyed by (`propertyId`, `key`), so re-running the seed only
/// refreshes values and timestamps.
pub struct PropertySeed<'a> {
    table: &'a str,
    owner_id: &'a str,
}

impl<'a> PropertySeed<'a> {
    pub fn new(table: &'a str, owner_id: &'a str) -> Self {
        Self { table, owner_id }
    }

    pub async fn load(
        &self,
        pool: &DbPool,
        properties: &[PropertyRecord],
    ) -> Result<SeedResult, RepositoryError> {
        if !is_sql_identifier(self.table) {
            return Err(RepositoryError::Decode(format!(
                "refusing to seed table `{}`: not a plain identifier",
                self.table
            )));
        }

        let exists_sql = format!(
            "SELECT COUNT(*) FROM \"{}\" WHERE \"propertyId\" = $1 AND \"key\" = $2",
            self.table
        );
        let upsert_sql = format!(
            "INSERT INTO \"{}\" \
             (\"id\", \"propertyId\", \"key\", \"value\", \"userId\", \"createdAt\", \"updatedAt\") \
             VALUES ($1, $2, $3, $4, $5, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP) \
             ON CONFLICT (\"propertyId\", \"key\") \
             DO UPDATE SET \"value\" = excluded.\"value\", \"updatedAt\" = CURRENT_TIMESTAMP",
            self.table
        );

        let mut result = SeedResult::default();
        let mut tx = pool.begin().await?;

        for property in properties {
            let property_id = property.id.0.as_str();
            info!(event_name = "seed.property.start", property_id, "seeding property");

            for (key, value) in property.to_rows() {
                let existing: i64 = sqlx::query_scalar(&exists_sql)
                    .bind(property_id)
                    .bind(&key)
                    .fetch_one(&mut *tx)
                    .await?;

                sqlx::query(&upsert_sql)
                    .bind(Uuid::new_v4().to_string())
                    .bind(property_id)
                    .bind(&key)
                    .bind(&value)
                    .bind(self.owner_id)
                    .execute(&mut *tx)
                    .await?;

                if existing == 0 {
                    result.inserted += 1;
                    debug!(event_name = "seed.row.inserted", property_id, key = %key, "inserted");
                } else {
                    result.updated += 1;
                    debug!(event_name = "seed.row.updated", property_id, key = %key, "updated");
                }
            }

            result.property_ids.push(property_id.to_string());
        }

        tx.commit().await?;
        Ok(result)
    }
}
