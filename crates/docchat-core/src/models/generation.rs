//! Model-agnostic generation parameters and results.
//!
//! The model client adapters translate these to and from their provider's
//! wire types; the chat service only ever sees the shapes below.

use serde::{Deserialize, Serialize};

/// Fixed parameters sent with every chat generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub safety: Vec<SafetySetting>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            temperature: 0.3,
            safety: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: BlockThreshold::MediumAndAbove,
                })
                .collect(),
        }
    }
}

/// A blocking threshold for one harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    Harassment,
    HateSpeech,
    SexuallyExplicit,
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HarmCategory::Harassment => "harassment",
            HarmCategory::HateSpeech => "hate speech",
            HarmCategory::SexuallyExplicit => "sexually explicit content",
            HarmCategory::DangerousContent => "dangerous content",
        }
    }
}

/// Lowest probability of harm at which content is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    LowAndAbove,
    MediumAndAbove,
    OnlyHigh,
    None,
}

/// What a model call produced, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Concatenated text of the reply. Empty when the provider returned
    /// nothing usable (including canned refusal text).
    pub text: String,
    pub finish: FinishReason,
    pub block: Option<SafetyBlock>,
}

impl ModelOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish: FinishReason::Stop,
            block: None,
        }
    }

    pub fn blocked(source: BlockSource, categories: Vec<HarmCategory>) -> Self {
        Self {
            text: String::new(),
            finish: FinishReason::Safety,
            block: Some(SafetyBlock { source, categories }),
        }
    }
}

/// Why generation stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of the reply or a stop sequence.
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    pub fn is_normal(&self) -> bool {
        matches!(self, FinishReason::Stop)
    }

    pub fn describe(&self) -> &str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::MaxTokens => "max_tokens",
            FinishReason::Safety => "safety",
            FinishReason::Other(reason) => reason,
        }
    }
}

/// A refusal signal from the provider's content-safety layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyBlock {
    pub source: BlockSource,
    pub categories: Vec<HarmCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    Prompt,
    Response,
}
