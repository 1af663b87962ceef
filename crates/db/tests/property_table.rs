use mtr_core::catalog::{builtin_properties, CATALOG_OWNER_ID};
use mtr_core::listing::{detail, resolve, summarize_all};
use mtr_core::source::PropertySource;
use mtr_db::{connect_with_settings, migrations, DbPool, PropertySeed, TableSource};

type PropertyTableTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

async fn seeded_pool() -> PropertyTableTestResult<DbPool> {
    let pool = connect_with_settings("sqlite::memory:", 1, 5)
        .await
        .map_err(|error| format!("pool should connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrations: {error}"))?;
    PropertySeed::new("PropertyContext", CATALOG_OWNER_ID)
        .load(&pool, &builtin_properties())
        .await
        .map_err(|error| format!("seed: {error}"))?;
    Ok(pool)
}

async fn insert_row(
    pool: &DbPool,
    property_id: &str,
    key: &str,
    value: &str,
) -> PropertyTableTestResult {
    sqlx::query(
        "INSERT INTO \"PropertyContext\" (\"id\", \"propertyId\", \"key\", \"value\") \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(format!("{property_id}:{key}"))
    .bind(property_id)
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .map_err(|error| format!("insert {key}: {error}"))?;
    Ok(())
}

#[tokio::test]
async fn seeded_table_answers_like_the_builtin_catalog() -> PropertyTableTestResult {
    let pool = seeded_pool().await?;
    let source = TableSource::new(pool.clone(), "PropertyContext");

    let mut from_table = source.fetch_all().await;
    let mut builtin = builtin_properties();
    from_table.sort_by(|a, b| a.id.cmp(&b.id));
    builtin.sort_by(|a, b| a.id.cmp(&b.id));

    require_eq!(summarize_all(&from_table), summarize_all(&builtin));
    require_eq!(detail("lander", &from_table), detail("lander", &builtin));

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn unmarked_rows_are_rendered_as_extra_context() -> PropertyTableTestResult {
    let pool = seeded_pool().await?;
    insert_row(&pool, "725012_1", "wifi_info", "Network BoulderGuest").await?;
    insert_row(&pool, "725012_1", "parking_spot", "Space 14").await?;

    let records = TableSource::new(pool.clone(), "PropertyContext").fetch_all().await;
    let boulder = resolve("boulder", &records).ok_or("boulder should resolve")?;
    require_eq!(boulder.extra_context.len(), 2);

    let answer = detail("boulder", &records);
    let lines = answer.lines().collect::<Vec<_>>();
    require_eq!(lines.len(), 3);
    require_eq!(lines[1], "Parking Spot: Space 14");
    require_eq!(lines[2], "Wifi Info: Network BoulderGuest");

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn blank_marked_values_fall_back_to_placeholders() -> PropertyTableTestResult {
    let pool = seeded_pool().await?;
    insert_row(&pool, "999_1", "_name", "Attic Room").await?;
    insert_row(&pool, "999_1", "_monthly_rent", "   ").await?;
    insert_row(&pool, "999_1", "_nickname", "attic").await?;

    let records = TableSource::new(pool.clone(), "PropertyContext").fetch_all().await;
    let attic = resolve("attic", &records).ok_or("attic should resolve")?;
    require!(attic.fields.monthly_rent().is_none(), "blank rent should read as absent");

    let summary = summarize_all(&records);
    require!(
        summary.contains("Attic Room, a rental, Contact for pricing"),
        "summary was: {summary}"
    );

    pool.close().await;
    Ok(())
}
