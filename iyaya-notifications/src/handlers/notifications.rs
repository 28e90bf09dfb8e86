use axum::{
    extract::{Path, Query, State},
    Json,
};
use iyaya_core::error::AppError;
use serde::Deserialize;
use validator::Validate;

use crate::{middleware::AuthUser, models::NotificationResponse, AppState};

const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

/// List the caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    query.validate()?;

    let notifications = state
        .db
        .list_for_user(
            &user.0.sub,
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Count of the caller's unread notifications.
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let unread = state.db.unread_count(&user.0.sub).await?;

    Ok(Json(serde_json::json!({ "unread": unread })))
}

/// Mark one of the caller's notifications as read.
///
/// Idempotent: repeating the call returns the same read state. An id that
/// does not resolve to a notification owned by the caller is NotFound,
/// whether it belongs to someone else or to no one.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification = state
        .db
        .mark_read(&user.0.sub, &notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Notification not found")))?;

    Ok(Json(notification.into()))
}

/// Mark every notification owned by the caller as read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let modified = state.db.mark_all_read(&user.0.sub).await?;
    tracing::debug!(user_id = %user.0.sub, modified, "Marked all notifications read");

    Ok(Json(serde_json::json!({ "modified": modified })))
}
