//! Administrative binary: run the verification backfill once and exit.

use iyaya_core::observability::init_tracing;
use iyaya_notifications::config::NotificationConfig;
use iyaya_notifications::maintenance::verify_emails;
use iyaya_notifications::services::MongoDb;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("info");

    let config = match NotificationConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let db = match MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = verify_emails::run(&db).await;

    match &result {
        Ok(r) => tracing::info!(
            legacy_migrated = r.legacy_migrated,
            emails_marked = r.emails_marked,
            users_total = r.users_total,
            "Verification backfill complete"
        ),
        Err(e) => tracing::error!("Verification backfill failed: {}", e),
    }

    // Disconnect exactly once, on success and failure alike.
    db.shutdown().await;

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
