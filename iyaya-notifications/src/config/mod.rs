use iyaya_core::config as core_config;
use iyaya_core::error::AppError;
use serde::Deserialize;
use std::env;

/// Build mode of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") | Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub endpoints: EndpointProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

/// One endpoint bundle the app runs against. Exactly two fixed bundles
/// exist; `resolve` picks one of them and resolution never fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointProfile {
    pub api_base_url: String,
    pub socket_url: String,
    pub backend_api_key: String,
    pub analytics_enabled: bool,
    pub debug_logging: bool,
}

impl EndpointProfile {
    pub fn development() -> Self {
        Self {
            api_base_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            socket_url: env::var("SOCKET_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            backend_api_key: backend_api_key(),
            analytics_enabled: false,
            debug_logging: true,
        }
    }

    pub fn production() -> Self {
        Self {
            api_base_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "https://api.iyaya.app/api".to_string()),
            socket_url: env::var("SOCKET_URL")
                .unwrap_or_else(|_| "https://api.iyaya.app".to_string()),
            backend_api_key: backend_api_key(),
            analytics_enabled: true,
            debug_logging: false,
        }
    }

    /// Select the active bundle. A development build always gets the
    /// development bundle, whatever the release channel says; otherwise the
    /// channel picks between the two bundles and anything absent or
    /// unrecognized falls back to development.
    pub fn resolve(environment: Environment, release_channel: Option<&str>) -> Self {
        if environment.is_development() {
            return Self::development();
        }

        match release_channel {
            Some("production") => Self::production(),
            _ => Self::development(),
        }
    }
}

fn backend_api_key() -> String {
    env::var("BACKEND_API_KEY").unwrap_or_else(|_| "dev-placeholder-key".to_string())
}

impl NotificationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = Environment::from_env();
        let release_channel = env::var("RELEASE_CHANNEL").ok();

        Ok(NotificationConfig {
            common: common_config,
            environment,
            mongodb: MongoConfig {
                uri: env::var("MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "iyaya".to_string()),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "iyaya-dev-secret-change-me".to_string()),
                access_token_expiry_minutes: env::var("JWT_EXPIRY_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
            security: SecurityConfig {
                allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:19006".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            endpoints: EndpointProfile::resolve(environment, release_channel.as_deref()),
        })
    }
}
