use crate::models::{Notification, User};
use futures::TryStreamExt;
use iyaya_core::error::AppError;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes");

        let notifications = self.notifications();

        // Index on user_id for per-user queries
        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_id_idx".to_string())
                    .build(),
            )
            .build();

        notifications
            .create_index(user_id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user_id index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        // Index on created_utc for time-based queries (descending for recent first)
        let created_index = IndexModel::builder()
            .keys(doc! { "created_utc": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_utc_idx".to_string())
                    .build(),
            )
            .build();

        notifications
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_utc index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        // Index on notification_id for quick lookups
        let notification_id_index = IndexModel::builder()
            .keys(doc! { "notification_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("notification_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        notifications
            .create_index(notification_id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create notification_id index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        // Unique index on user email
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.users()
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    /// Release the underlying client. Call once, as the final step of
    /// short-lived maintenance binaries.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
    }

    pub fn notifications(&self) -> Collection<Notification> {
        self.db.collection("notifications")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    // ==================== Notification Operations ====================

    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        self.notifications()
            .insert_one(notification, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert notification: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<Notification>, AppError> {
        let find_options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_utc": -1 })
            .limit(limit)
            .skip(offset)
            .build();

        let cursor = self
            .notifications()
            .find(doc! { "user_id": user_id }, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list notifications: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let notifications: Vec<Notification> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect notifications: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<u64, AppError> {
        self.notifications()
            .count_documents(doc! { "user_id": user_id, "read": false }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count unread notifications: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    /// Mark one of `user_id`'s notifications read and return its current
    /// state. The owner is part of the filter, so an id belonging to another
    /// user resolves to `None` exactly like a missing one. Already-read
    /// notifications match nothing in the update and keep their original
    /// read timestamp.
    pub async fn mark_read(
        &self,
        user_id: &str,
        notification_id: &str,
    ) -> Result<Option<Notification>, AppError> {
        self.notifications()
            .update_one(
                doc! {
                    "notification_id": notification_id,
                    "user_id": user_id,
                    "read": false,
                },
                doc! { "$set": { "read": true, "read_utc": BsonDateTime::now() } },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark notification read: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        self.notifications()
            .find_one(
                doc! { "notification_id": notification_id, "user_id": user_id },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to find notification: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    /// Mark every unread notification owned by `user_id` as read. Returns
    /// the number of documents modified.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .notifications()
            .update_many(
                doc! { "user_id": user_id, "read": false },
                doc! { "$set": { "read": true, "read_utc": BsonDateTime::now() } },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark all notifications read: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(result.modified_count)
    }

    // ==================== User Operations ====================

    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.users().insert_one(user, None).await.map_err(|e| {
            tracing::error!("Failed to insert user: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find user: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users().find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect users: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })
    }

    /// Set the canonical verification flag for the given emails. Returns the
    /// number of documents modified (already-verified users match nothing).
    pub async fn mark_emails_verified(&self, emails: &[&str]) -> Result<u64, AppError> {
        let emails: Vec<String> = emails.iter().map(|e| e.to_string()).collect();
        let result = self
            .users()
            .update_many(
                doc! { "email": { "$in": emails }, "email_verified": { "$ne": true } },
                doc! { "$set": { "email_verified": true } },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark emails verified: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(result.modified_count)
    }

    /// Fold legacy verification flags into the canonical field and unset
    /// them. Idempotent: documents without legacy fields match nothing.
    pub async fn migrate_legacy_verification(&self) -> Result<u64, AppError> {
        let filter = doc! {
            "$or": [
                { "verification": { "$exists": true } },
                { "emailVerified": { "$exists": true } },
            ]
        };

        let mut cursor = self.users().find(filter, None).await.map_err(|e| {
            tracing::error!("Failed to query users with legacy flags: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        let mut migrated = 0;
        while let Some(user) = cursor.try_next().await.map_err(|e| {
            tracing::error!("Failed to iterate users with legacy flags: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })? {
            let resolved = user.resolved_email_verified();
            self.users()
                .update_one(
                    doc! { "_id": &user.id },
                    doc! {
                        "$set": { "email_verified": resolved },
                        "$unset": { "verification": "", "emailVerified": "" },
                    },
                    None,
                )
                .await
                .map_err(|e| {
                    tracing::error!(user_id = %user.id, "Failed to fold legacy flags: {}", e);
                    AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
                })?;
            migrated += 1;
        }

        Ok(migrated)
    }
}
