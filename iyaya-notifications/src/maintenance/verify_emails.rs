//! One-shot verification backfill.
//!
//! Folds legacy verification flags into the canonical `email_verified`
//! field, marks a fixed set of known accounts verified, then logs every
//! user's resolved status. Safe to run more than once.

use iyaya_core::error::AppError;

use crate::services::MongoDb;

/// Accounts marked verified by the backfill.
pub const VERIFIED_EMAILS: [&str; 3] = [
    "admin@iyaya.app",
    "caregiver.demo@iyaya.app",
    "parent.demo@iyaya.app",
];

/// Result of the backfill run.
#[derive(Debug)]
pub struct BackfillResult {
    pub legacy_migrated: u64,
    pub emails_marked: u64,
    pub users_total: u64,
}

pub async fn run(db: &MongoDb) -> Result<BackfillResult, AppError> {
    tracing::info!("Starting verification backfill");

    let legacy_migrated = db.migrate_legacy_verification().await?;
    tracing::info!(count = legacy_migrated, "Folded legacy verification flags");

    let emails_marked = db.mark_emails_verified(&VERIFIED_EMAILS).await?;
    tracing::info!(count = emails_marked, "Marked known accounts verified");

    let users = db.list_users().await?;
    for user in &users {
        tracing::info!(
            email = %user.email,
            verified = user.resolved_email_verified(),
            "User verification status"
        );
    }

    Ok(BackfillResult {
        legacy_migrated,
        emails_marked,
        users_total: users.len() as u64,
    })
}
