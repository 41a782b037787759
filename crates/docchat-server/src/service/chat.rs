//! One chat turn: validate, build the prompt, call the model, interpret the
//! result, and record the interaction.
//!
//! The reply and the write are reported separately in [`ChatTurn`]. A failed
//! write is logged but never turns a good reply into an error, and a failed
//! turn still leaves an error record behind when the caller is known.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use docchat_bedrock::LanguageModel;
use docchat_core::models::generation::{BlockSource, GenerationConfig, ModelOutput, SafetyBlock};
use docchat_core::models::interaction::NewInteraction;
use docchat_core::prompt::{build_prompt, has_content, PromptContext};
use docchat_storage::InteractionStore;

use super::error::ServiceError;

pub const EMPTY_QUERY_MESSAGE: &str = "Query must be a non-empty string.";
pub const EMPTY_RESPONSE_DETAIL: &str = "model returned an empty response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub context_used: bool,
}

/// What happened to the interaction record for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOutcome {
    Persisted(Uuid),
    Failed(String),
    /// Nothing was written: the turn was rejected before reaching the model.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub reply: Result<ChatReply, ServiceError>,
    pub storage: StorageOutcome,
}

impl ChatTurn {
    fn rejected(err: ServiceError) -> Self {
        Self {
            reply: Err(err),
            storage: StorageOutcome::Skipped,
        }
    }
}

#[derive(Clone)]
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    store: Arc<dyn InteractionStore>,
    generation: GenerationConfig,
}

impl ChatService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn InteractionStore>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            model,
            store,
            generation,
        }
    }

    /// Run one turn for `caller`. `query` is `None` when the request carried
    /// no string query at all.
    pub async fn handle(
        &self,
        caller: Option<&str>,
        query: Option<&str>,
        document_text: Option<&str>,
    ) -> ChatTurn {
        let Some(owner_id) = caller else {
            return ChatTurn::rejected(ServiceError::Unauthorized);
        };
        let Some(query) = query.filter(|q| has_content(q)) else {
            return ChatTurn::rejected(ServiceError::Validation(EMPTY_QUERY_MESSAGE.to_string()));
        };

        let prompt = build_prompt(query, document_text);
        let context_used = prompt.context_used();
        if let PromptContext::Document {
            embedded_chars,
            truncated,
        } = prompt.context
        {
            info!(owner_id, embedded_chars, truncated, "document context attached");
        }

        let generated = match self.model.generate(&prompt.text, &self.generation).await {
            Ok(output) => interpret(output),
            Err(e) => Err(ServiceError::Internal(e.to_string())),
        };

        match generated {
            Ok(text) => {
                let storage = self
                    .persist(NewInteraction::reply(owner_id, query, &text, context_used))
                    .await;
                ChatTurn {
                    reply: Ok(ChatReply { text, context_used }),
                    storage,
                }
            }
            Err(err) => {
                match &err {
                    ServiceError::Internal(detail) => {
                        error!(owner_id, detail = %detail, "chat turn failed");
                    }
                    other => warn!(owner_id, reason = %other, "chat turn rejected"),
                }
                let storage = self.persist(NewInteraction::error(owner_id, query)).await;
                ChatTurn {
                    reply: Err(err),
                    storage,
                }
            }
        }
    }

    async fn persist(&self, interaction: NewInteraction) -> StorageOutcome {
        let owner_id = interaction.owner_id.clone();
        match self.store.insert(interaction).await {
            Ok(record) => {
                info!(owner_id = %owner_id, interaction_id = %record.id, is_error = record.is_error, "interaction recorded");
                StorageOutcome::Persisted(record.id)
            }
            Err(e) => {
                warn!(owner_id = %owner_id, error = %e, "failed to record interaction");
                StorageOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Turn raw model output into reply text or a caller-facing failure.
///
/// Text wins: any non-blank reply is returned even if a safety or finish
/// signal is also present.
pub fn interpret(output: ModelOutput) -> Result<String, ServiceError> {
    if has_content(&output.text) {
        return Ok(output.text);
    }

    if let Some(block) = &output.block {
        return Err(ServiceError::Validation(blocked_message(block)));
    }

    if !output.finish.is_normal() {
        return Err(ServiceError::Validation(format!(
            "The response could not be completed (reason: {}).",
            output.finish.describe()
        )));
    }

    Err(ServiceError::Internal(EMPTY_RESPONSE_DETAIL.to_string()))
}

fn blocked_message(block: &SafetyBlock) -> String {
    let subject = match block.source {
        BlockSource::Prompt => "Your query was blocked",
        BlockSource::Response => "The response was blocked",
    };

    if block.categories.is_empty() {
        format!("{subject} by the content safety policy.")
    } else {
        let labels: Vec<&str> = block.categories.iter().map(|c| c.label()).collect();
        format!("{subject} by the content safety policy ({}).", labels.join(", "))
    }
}
