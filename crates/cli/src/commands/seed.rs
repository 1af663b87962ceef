use crate::commands::{current_thread_runtime, database_url, load_config, CommandResult};
use mtr_core::catalog::{builtin_properties, CATALOG_OWNER_ID};
use mtr_db::{connect_with_settings, migrations, PropertySeed};

/// Applies migrations, then upserts the built-in catalog into the property table.
pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let url = match database_url("seed", &config) {
        Ok(url) => url,
        Err(failure) => return failure,
    };
    let runtime = match current_thread_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = PropertySeed::new(&config.database.table, CATALOG_OWNER_ID)
            .load(&pool, &builtin_properties())
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8));

        pool.close().await;
        seeded
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", seeded.summary()),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
