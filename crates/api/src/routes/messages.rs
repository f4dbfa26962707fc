//! Message endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::{MessageId, UserId};

use crate::db::MessageRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Message;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageFilter {
    /// `sent` to list outgoing messages; anything else is the inbox.
    #[serde(rename = "type")]
    pub box_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub subject: String,
    pub content: String,
    pub receiver_id: Option<UserId>,
    #[serde(default)]
    pub is_broadcast: bool,
}

/// `GET /api/messages` (`?type=sent` for the outbox)
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<MessageFilter>,
) -> Result<Json<Vec<Message>>> {
    let repo = MessageRepository::new(state.pool());

    let messages = if filter.box_type.as_deref() == Some("sent") {
        repo.sent(user.id).await?
    } else {
        repo.inbox(user.id).await?
    };

    Ok(Json(messages))
}

/// `POST /api/messages`
///
/// Broadcasts are admin-only. A direct message must name a receiver.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    if req.subject.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "subject and content are required".to_string(),
        ));
    }

    if req.is_broadcast {
        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "only admins can broadcast".to_string(),
            ));
        }
    } else if req.receiver_id.is_none() {
        return Err(AppError::BadRequest(
            "a direct message needs a receiver".to_string(),
        ));
    }

    let receiver_id = if req.is_broadcast { None } else { req.receiver_id };

    let message = MessageRepository::new(state.pool())
        .create(
            user.id,
            receiver_id,
            req.is_broadcast,
            &req.subject,
            &req.content,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// `PUT /api/messages/{id}/read`
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<MessageId>,
) -> Result<Json<Value>> {
    MessageRepository::new(state.pool())
        .mark_read(id, user.id)
        .await?;
    Ok(Json(json!({ "read": true })))
}
