//! docchat-bedrock
//!
//! Bedrock model invocation, safety guardrails, and document extraction
//! through the Converse API.

pub mod client;
pub mod error;
pub mod extract;
pub mod generate;
pub mod guardrail;

pub use generate::{BedrockModel, LanguageModel};
