use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Text stored as the bot response when a chat turn failed after the caller
/// was identified.
pub const ERROR_SENTINEL: &str = "[system error] The assistant could not generate a response.";

/// One persisted chat turn: a query and the response it produced.
///
/// Records are append-only. `id` and `created_at` are assigned by the store
/// at insertion; nothing rewrites a record afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub created_at: jiff::Timestamp,
    pub owner_id: String,
    pub user_query: String,
    pub bot_response: Option<String>,
    pub pdf_context_used: bool,
    /// Marks records written on the failure path. Older rows without the
    /// field read back as `false`.
    #[serde(default)]
    pub is_error: bool,
}

/// An interaction record before the store has assigned its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub owner_id: String,
    pub user_query: String,
    pub bot_response: Option<String>,
    pub pdf_context_used: bool,
    pub is_error: bool,
}

impl NewInteraction {
    /// A completed turn with the model's reply.
    pub fn reply(owner_id: &str, user_query: &str, response: &str, pdf_context_used: bool) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            user_query: user_query.to_string(),
            bot_response: Some(response.to_string()),
            pdf_context_used,
            is_error: false,
        }
    }

    /// A failed turn. Context is never recorded as used on this path.
    pub fn error(owner_id: &str, user_query: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            user_query: user_query.to_string(),
            bot_response: Some(ERROR_SENTINEL.to_string()),
            pdf_context_used: false,
            is_error: true,
        }
    }

    pub fn into_record(self, id: Uuid, created_at: jiff::Timestamp) -> InteractionRecord {
        InteractionRecord {
            id,
            created_at,
            owner_id: self.owner_id,
            user_query: self.user_query,
            bot_response: self.bot_response,
            pdf_context_used: self.pdf_context_used,
            is_error: self.is_error,
        }
    }
}
