pub mod notification;
pub mod user;

pub use notification::{Notification, NotificationKind, NotificationResponse};
pub use user::User;
