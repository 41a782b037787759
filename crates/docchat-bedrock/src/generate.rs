//! Single-turn text generation through the Bedrock Converse API.
//!
//! # Safety signals
//!
//! Content-safety thresholds are enforced by a Bedrock guardrail attached to
//! every request (see [`crate::guardrail`]). When the guardrail intervenes,
//! Converse still returns text: the guardrail's canned "blocked" message.
//! That text is not a reply, so it is dropped and the intervention is
//! reported as a [`SafetyBlock`](docchat_core::models::generation::SafetyBlock)
//! instead:
//!
//! | `stop_reason`          | reported as                                   |
//! |------------------------|-----------------------------------------------|
//! | `end_turn`, `stop_sequence` | normal stop, text kept                   |
//! | `max_tokens`           | abnormal finish, text kept                    |
//! | `guardrail_intervened` | prompt- or response-side block (from trace)   |
//! | `content_filtered`     | response-side block                           |
//! | anything else          | abnormal finish with the raw reason           |

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, GuardrailTraceAssessment, InferenceConfiguration, Message,
    StopReason,
};
use tracing::info;

use docchat_core::models::generation::{
    BlockSource, FinishReason, GenerationConfig, ModelOutput,
};

use crate::error::BedrockError;
use crate::guardrail::{self, GuardrailRef};

/// A hosted language model that turns one prompt into one reply.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<ModelOutput, BedrockError>;
}

/// [`LanguageModel`] backed by a Bedrock inference profile.
#[derive(Clone)]
pub struct BedrockModel {
    client: Client,
    model_id: String,
    guardrail: Option<GuardrailRef>,
}

impl BedrockModel {
    pub fn new(client: Client, model_id: impl Into<String>, guardrail: Option<GuardrailRef>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            guardrail,
        }
    }
}

#[async_trait]
impl LanguageModel for BedrockModel {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<ModelOutput, BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(i32::try_from(config.max_output_tokens).unwrap_or(i32::MAX))
            .temperature(config.temperature)
            .build();

        let mut request = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .inference_config(inference);

        if let Some(guardrail) = &self.guardrail {
            request = request.guardrail_config(guardrail.converse_config()?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let text = response
            .output()
            .and_then(|o| o.as_message().ok())
            .map(|message| {
                message
                    .content()
                    .iter()
                    .filter_map(|block| {
                        if let ContentBlock::Text(text) = block {
                            Some(text.as_str())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let (input_tokens, output_tokens) = response
            .usage()
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or((0, 0));

        info!(
            model_id = %self.model_id,
            stop_reason = response.stop_reason().as_str(),
            input_tokens,
            output_tokens,
            "model invocation complete"
        );

        let assessment = response.trace().and_then(|t| t.guardrail());
        Ok(model_output(text, response.stop_reason(), assessment))
    }
}

/// Map a Converse stop reason to a provider-neutral finish reason.
pub fn finish_reason(stop: &StopReason) -> FinishReason {
    match stop {
        StopReason::EndTurn | StopReason::StopSequence => FinishReason::Stop,
        StopReason::MaxTokens => FinishReason::MaxTokens,
        StopReason::GuardrailIntervened | StopReason::ContentFiltered => FinishReason::Safety,
        other => FinishReason::Other(other.as_str().to_string()),
    }
}

/// Combine the pieces of a Converse response into a [`ModelOutput`].
pub fn model_output(
    text: String,
    stop: &StopReason,
    assessment: Option<&GuardrailTraceAssessment>,
) -> ModelOutput {
    match stop {
        StopReason::GuardrailIntervened => {
            let (source, categories) = guardrail::classify_intervention(assessment);
            ModelOutput::blocked(source, categories)
        }
        StopReason::ContentFiltered => ModelOutput::blocked(BlockSource::Response, Vec::new()),
        other => ModelOutput {
            text,
            finish: finish_reason(other),
            block: None,
        },
    }
}
