use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use docchat_core::models::message::DisplayMessage;

use crate::error::ApiError;
use crate::middleware::auth::Caller;
use crate::service::ServiceError;
use crate::state::AppState;
use crate::CHAT_BODY_LIMIT;

/// Body of `POST /api/chat`. Fields are read loosely so that a missing or
/// non-string query is reported as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub pdf_text: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn post_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            if caller.owner_id().is_none() {
                return Err(ServiceError::Unauthorized.into());
            }
            return Err(ApiError::BadRequest(format!(
                "The request body exceeds the {} MiB limit.",
                CHAT_BODY_LIMIT / (1024 * 1024)
            )));
        }
        Err(rejection) => {
            debug!(error = %rejection, "unreadable chat body");
            ChatRequest::default()
        }
    };

    let turn = state
        .chat
        .handle(caller.owner_id(), request.query.as_str(), request.pdf_text.as_str())
        .await;

    let reply = turn.reply?;
    Ok(Json(ChatResponse { reply: reply.text }))
}

pub async fn get_history(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<DisplayMessage>>, ApiError> {
    let messages = state.history.load(caller.owner_id()).await?;
    Ok(Json(messages))
}
