mod common;

use common::test_config;
use iyaya_notifications::maintenance::verify_emails::{self, VERIFIED_EMAILS};
use iyaya_notifications::models::user::{User, VerificationFlags};
use iyaya_notifications::services::MongoDb;

async fn test_db() -> MongoDb {
    let config = test_config();
    MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Failed to connect to DB")
}

#[tokio::test]
async fn backfill_marks_fixed_accounts_and_leaves_others_alone() {
    let db = test_db().await;

    for (i, email) in VERIFIED_EMAILS.iter().enumerate() {
        db.insert_user(&User::new(email.to_string(), format!("Known {}", i)))
            .await
            .expect("Failed to seed user");
    }
    db.insert_user(&User::new(
        "bystander@example.com".to_string(),
        "Bystander".to_string(),
    ))
    .await
    .expect("Failed to seed user");

    let result = verify_emails::run(&db).await.expect("Backfill failed");

    assert_eq!(result.emails_marked, 3);
    assert_eq!(result.users_total, 4);

    for email in VERIFIED_EMAILS {
        let user = db
            .find_user_by_email(email)
            .await
            .expect("Failed to find user")
            .expect("Known user missing");
        assert!(user.email_verified);
        assert!(user.resolved_email_verified());
    }

    let bystander = db
        .find_user_by_email("bystander@example.com")
        .await
        .expect("Failed to find user")
        .expect("Bystander missing");
    assert!(!bystander.resolved_email_verified());
}

#[tokio::test]
async fn backfill_folds_legacy_flags_into_canonical_field() {
    let db = test_db().await;

    let mut nested = User::new("nested@example.com".to_string(), "Nested".to_string());
    nested.verification = Some(VerificationFlags {
        email_verified: true,
    });
    db.insert_user(&nested).await.expect("Failed to seed user");

    let mut top_level = User::new("legacy@example.com".to_string(), "Legacy".to_string());
    top_level.email_verified_legacy = Some(true);
    db.insert_user(&top_level)
        .await
        .expect("Failed to seed user");

    let mut unverified = User::new(
        "unverified@example.com".to_string(),
        "Unverified".to_string(),
    );
    unverified.verification = Some(VerificationFlags {
        email_verified: false,
    });
    db.insert_user(&unverified)
        .await
        .expect("Failed to seed user");

    let result = verify_emails::run(&db).await.expect("Backfill failed");
    assert_eq!(result.legacy_migrated, 3);

    let nested = db
        .find_user_by_email("nested@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(nested.email_verified);
    assert!(!nested.has_legacy_flags());

    let top_level = db
        .find_user_by_email("legacy@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(top_level.email_verified);
    assert!(!top_level.has_legacy_flags());

    let unverified = db
        .find_user_by_email("unverified@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!unverified.email_verified);
    assert!(!unverified.has_legacy_flags());
}

#[tokio::test]
async fn backfill_is_idempotent() {
    let db = test_db().await;

    let mut user = User::new(VERIFIED_EMAILS[0].to_string(), "Known".to_string());
    user.email_verified_legacy = Some(false);
    db.insert_user(&user).await.expect("Failed to seed user");

    let first = verify_emails::run(&db).await.expect("Backfill failed");
    assert_eq!(first.legacy_migrated, 1);
    assert_eq!(first.emails_marked, 1);

    let second = verify_emails::run(&db).await.expect("Backfill failed");
    assert_eq!(second.legacy_migrated, 0);
    assert_eq!(second.emails_marked, 0);
}
