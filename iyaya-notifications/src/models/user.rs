//! User model - account records with a canonical email-verification flag.
//!
//! Older documents carried the flag twice: nested under `verification` and
//! as a top-level `emailVerified` boolean. Both legacy fields are accepted
//! on read so pre-migration documents still deserialize; the verify-emails
//! maintenance binary folds them into `email_verified` and unsets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Legacy nested verification sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFlags {
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationFlags>,
    #[serde(
        default,
        rename = "emailVerified",
        skip_serializing_if = "Option::is_none"
    )]
    pub email_verified_legacy: Option<bool>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_utc: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            email_verified: false,
            verification: None,
            email_verified_legacy: None,
            created_utc: Utc::now(),
        }
    }

    /// Effective verification status: canonical flag OR either legacy flag.
    pub fn resolved_email_verified(&self) -> bool {
        self.email_verified
            || self
                .verification
                .as_ref()
                .map(|v| v.email_verified)
                .unwrap_or(false)
            || self.email_verified_legacy.unwrap_or(false)
    }

    /// Whether this document still carries pre-migration flags.
    pub fn has_legacy_flags(&self) -> bool {
        self.verification.is_some() || self.email_verified_legacy.is_some()
    }
}
