use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Booking,
    Message,
    Payment,
    System,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Booking => write!(f, "booking"),
            NotificationKind::Message => write!(f, "message"),
            NotificationKind::Payment => write!(f, "payment"),
            NotificationKind::System => write!(f, "system"),
        }
    }
}

/// A per-user event record with a monotonic unread -> read state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub notification_id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_chrono_datetime_as_bson_datetime"
    )]
    pub read_utc: Option<DateTime<Utc>>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_utc: DateTime<Utc>,
}

// Helper module for optional DateTime<Utc> as BSON DateTime
mod opt_chrono_datetime_as_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(dt) => {
                let bson_dt = bson::DateTime::from_chrono(*dt);
                bson_dt.serialize(serializer)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<bson::DateTime> = Option::deserialize(deserializer)?;
        Ok(opt.map(|dt| dt.to_chrono()))
    }
}

impl Notification {
    pub fn new(user_id: String, kind: NotificationKind, title: String, body: String) -> Self {
        Self {
            id: None,
            notification_id: uuid::Uuid::new_v4().to_string(),
            user_id,
            kind,
            title,
            body,
            read: false,
            read_utc: None,
            created_utc: Utc::now(),
        }
    }

    /// Transition to read. Calling this on an already-read notification is
    /// a no-op; the original read timestamp is kept.
    pub fn mark_read(&mut self) {
        if !self.read {
            self.read = true;
            self.read_utc = Some(Utc::now());
        }
    }
}

/// API shape of a notification; timestamps serialize as RFC 3339 instead of
/// BSON datetimes.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub notification_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub read_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            notification_id: n.notification_id,
            kind: n.kind,
            title: n.title,
            body: n.body,
            read: n.read,
            read_utc: n.read_utc,
            created_utc: n.created_utc,
        }
    }
}
