#![allow(dead_code)]

use chrono::{DateTime, Utc};
use iyaya_core::config::Config as CoreConfig;
use iyaya_notifications::config::{
    EndpointProfile, Environment, JwtConfig, MongoConfig, NotificationConfig, SecurityConfig,
};
use iyaya_notifications::models::{Notification, NotificationKind, User};
use iyaya_notifications::services::{JwtService, MongoDb};
use iyaya_notifications::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub jwt: JwtService,
}

pub fn test_config() -> NotificationConfig {
    NotificationConfig {
        common: CoreConfig { port: 0 },
        environment: Environment::Development,
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("iyaya_test_{}", uuid::Uuid::new_v4()),
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_minutes: 60,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:19006".to_string()],
        },
        endpoints: EndpointProfile::resolve(Environment::Development, None),
    }
}

impl TestApp {
    /// Spawn the service on a random port against a fresh database.
    pub async fn spawn() -> Self {
        let config = test_config();
        let jwt = JwtService::new(&config.jwt);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            jwt,
        }
    }

    /// Mint a valid access token for the given identity.
    pub fn token_for(&self, user_id: &str, email: &str) -> String {
        self.jwt
            .generate_access_token(user_id, email)
            .expect("Failed to generate test token")
    }

    /// Insert a notification for a user, with an explicit creation time so
    /// ordering assertions are deterministic.
    pub async fn seed_notification(
        &self,
        user_id: &str,
        title: &str,
        created_utc: DateTime<Utc>,
    ) -> Notification {
        let mut notification = Notification::new(
            user_id.to_string(),
            NotificationKind::Booking,
            title.to_string(),
            format!("{} body", title),
        );
        notification.created_utc = created_utc;

        self.db
            .insert_notification(&notification)
            .await
            .expect("Failed to seed notification");

        notification
    }

    /// Insert an unverified user.
    pub async fn seed_user(&self, email: &str, name: &str) -> User {
        let user = User::new(email.to_string(), name.to_string());
        self.db.insert_user(&user).await.expect("Failed to seed user");
        user
    }
}
