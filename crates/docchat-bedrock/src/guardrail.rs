//! Content-safety guardrail management.
//!
//! Bedrock has no per-request safety thresholds; they live on a guardrail
//! resource whose content filters are configured once and then referenced by
//! id and version on every Converse call. The chat's four moderate
//! thresholds map onto guardrail content filters as follows:
//!
//! ```text
//! harassment          -> INSULTS
//! hate speech         -> HATE
//! sexually explicit   -> SEXUAL
//! dangerous content   -> MISCONDUCT
//! ```
//!
//! A "block medium and above" threshold is a MEDIUM filter strength; a
//! stricter threshold is a stronger filter.

use std::collections::HashSet;

use aws_sdk_bedrock::types::{
    GuardrailContentFilter, GuardrailContentFilterConfig, GuardrailContentFilterType,
    GuardrailContentPolicyConfig, GuardrailFilterStrength,
};
use aws_sdk_bedrockruntime::types::{
    GuardrailAssessment, GuardrailConfiguration, GuardrailContentPolicyAction,
    GuardrailTraceAssessment, GuardrailTrace,
};
use tracing::info;

use docchat_core::models::generation::{BlockSource, BlockThreshold, HarmCategory, SafetySetting};

use crate::error::BedrockError;

const BLOCKED_INPUT_MESSAGE: &str = "This request was blocked by the content safety policy.";
const BLOCKED_OUTPUT_MESSAGE: &str = "This response was blocked by the content safety policy.";

/// A published guardrail version to attach to Converse requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardrailRef {
    pub id: String,
    pub version: String,
}

impl GuardrailRef {
    /// Request-side configuration, with tracing enabled so interventions
    /// can be attributed to the prompt or the response.
    pub fn converse_config(&self) -> Result<GuardrailConfiguration, BedrockError> {
        Ok(GuardrailConfiguration::builder()
            .guardrail_identifier(&self.id)
            .guardrail_version(&self.version)
            .trace(GuardrailTrace::Enabled)
            .build())
    }
}

pub fn filter_type(category: HarmCategory) -> GuardrailContentFilterType {
    match category {
        HarmCategory::Harassment => GuardrailContentFilterType::Insults,
        HarmCategory::HateSpeech => GuardrailContentFilterType::Hate,
        HarmCategory::SexuallyExplicit => GuardrailContentFilterType::Sexual,
        HarmCategory::DangerousContent => GuardrailContentFilterType::Misconduct,
    }
}

pub fn filter_strength(threshold: BlockThreshold) -> GuardrailFilterStrength {
    match threshold {
        BlockThreshold::LowAndAbove => GuardrailFilterStrength::High,
        BlockThreshold::MediumAndAbove => GuardrailFilterStrength::Medium,
        BlockThreshold::OnlyHigh => GuardrailFilterStrength::Low,
        BlockThreshold::None => GuardrailFilterStrength::None,
    }
}

/// Harm category reported by a runtime content filter, if it is one we
/// configure.
pub fn harm_category(
    filter: &aws_sdk_bedrockruntime::types::GuardrailContentFilterType,
) -> Option<HarmCategory> {
    use aws_sdk_bedrockruntime::types::GuardrailContentFilterType as Runtime;

    match filter {
        Runtime::Insults => Some(HarmCategory::Harassment),
        Runtime::Hate => Some(HarmCategory::HateSpeech),
        Runtime::Sexual => Some(HarmCategory::SexuallyExplicit),
        Runtime::Misconduct => Some(HarmCategory::DangerousContent),
        _ => None,
    }
}

/// Decide whether a guardrail intervention blocked the prompt or the
/// response, and which harm categories triggered it.
///
/// Input blocks stop the request before generation, so output assessments
/// only exist when the model produced something. Without a trace the block
/// is attributed to the prompt.
pub fn classify_intervention(
    assessment: Option<&GuardrailTraceAssessment>,
) -> (BlockSource, Vec<HarmCategory>) {
    let Some(assessment) = assessment else {
        return (BlockSource::Prompt, Vec::new());
    };

    let input: Vec<&GuardrailAssessment> = assessment
        .input_assessment()
        .map(|m| m.values().collect())
        .unwrap_or_default();
    let output: Vec<&GuardrailAssessment> = assessment
        .output_assessments()
        .map(|m| m.values().flatten().collect())
        .unwrap_or_default();

    if !input.iter().any(|a| is_blocking(a)) && !output.is_empty() {
        (BlockSource::Response, blocked_categories(&output))
    } else {
        (BlockSource::Prompt, blocked_categories(&input))
    }
}

fn is_blocking(assessment: &GuardrailAssessment) -> bool {
    assessment.content_policy().is_some_and(|policy| {
        policy
            .filters()
            .iter()
            .any(|f| *f.action() == GuardrailContentPolicyAction::Blocked)
    })
}

fn blocked_categories(assessments: &[&GuardrailAssessment]) -> Vec<HarmCategory> {
    let found: HashSet<HarmCategory> = assessments
        .iter()
        .filter_map(|a| a.content_policy())
        .flat_map(|policy| policy.filters())
        .filter(|f| *f.action() == GuardrailContentPolicyAction::Blocked)
        .filter_map(|f| harm_category(f.r#type()))
        .collect();

    HarmCategory::ALL
        .into_iter()
        .filter(|c| found.contains(c))
        .collect()
}

/// Find the guardrail called `name`, creating it from `safety` if it does
/// not exist, and return its newest published version (publishing one if
/// there is none yet). An existing guardrail whose content filters differ
/// from `safety` is an error.
pub async fn ensure_guardrail(
    config: &aws_config::SdkConfig,
    name: &str,
    safety: &[SafetySetting],
) -> Result<GuardrailRef, BedrockError> {
    let client = aws_sdk_bedrock::Client::new(config);

    let id = match find_guardrail_id(&client, name).await? {
        Some(id) => {
            verify_existing_filters(&client, &id, safety).await?;
            id
        }
        None => create_guardrail(&client, name, safety).await?,
    };

    let version = match latest_published_version(&client, &id).await? {
        Some(version) => version,
        None => {
            let response = client
                .create_guardrail_version()
                .guardrail_identifier(&id)
                .description("published by docchat")
                .send()
                .await
                .map_err(|e| BedrockError::Guardrail(e.into_service_error().to_string()))?;
            response.version().to_string()
        }
    };

    info!(guardrail_id = %id, version = %version, "guardrail ready");

    Ok(GuardrailRef { id, version })
}

async fn find_guardrail_id(
    client: &aws_sdk_bedrock::Client,
    name: &str,
) -> Result<Option<String>, BedrockError> {
    let mut next_token: Option<String> = None;

    loop {
        let mut req = client.list_guardrails().max_results(100);
        if let Some(token) = &next_token {
            req = req.next_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| BedrockError::Guardrail(e.into_service_error().to_string()))?;

        if let Some(found) = resp.guardrails().iter().find(|g| g.name() == name) {
            return Ok(Some(found.id().to_string()));
        }

        match resp.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => return Ok(None),
        }
    }
}

async fn create_guardrail(
    client: &aws_sdk_bedrock::Client,
    name: &str,
    safety: &[SafetySetting],
) -> Result<String, BedrockError> {
    let filters = safety
        .iter()
        .map(|setting| {
            let strength = filter_strength(setting.threshold);
            GuardrailContentFilterConfig::builder()
                .r#type(filter_type(setting.category))
                .input_strength(strength.clone())
                .output_strength(strength)
                .build()
                .map_err(|e| BedrockError::Guardrail(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let policy = GuardrailContentPolicyConfig::builder()
        .set_filters_config(Some(filters))
        .build()
        .map_err(|e| BedrockError::Guardrail(e.to_string()))?;

    let response = client
        .create_guardrail()
        .name(name)
        .description("Content safety thresholds for docchat")
        .content_policy_config(policy)
        .blocked_input_messaging(BLOCKED_INPUT_MESSAGE)
        .blocked_outputs_messaging(BLOCKED_OUTPUT_MESSAGE)
        .send()
        .await
        .map_err(|e| BedrockError::Guardrail(e.into_service_error().to_string()))?;

    info!(guardrail_id = response.guardrail_id(), name, "guardrail created");

    Ok(response.guardrail_id().to_string())
}

/// Highest numbered version of a guardrail; `DRAFT` is not a published
/// version.
async fn latest_published_version(
    client: &aws_sdk_bedrock::Client,
    id: &str,
) -> Result<Option<String>, BedrockError> {
    let mut latest: Option<u32> = None;
    let mut next_token: Option<String> = None;

    loop {
        let mut req = client
            .list_guardrails()
            .guardrail_identifier(id)
            .max_results(100);
        if let Some(token) = &next_token {
            req = req.next_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| BedrockError::Guardrail(e.into_service_error().to_string()))?;

        let page_max = resp
            .guardrails()
            .iter()
            .filter_map(|g| g.version().parse::<u32>().ok())
            .max();
        latest = latest.max(page_max);

        match resp.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => return Ok(latest.map(|v| v.to_string())),
        }
    }
}

/// Fail when a guardrail found by name does not enforce `safety`.
async fn verify_existing_filters(
    client: &aws_sdk_bedrock::Client,
    id: &str,
    safety: &[SafetySetting],
) -> Result<(), BedrockError> {
    let resp = client
        .get_guardrail()
        .guardrail_identifier(id)
        .send()
        .await
        .map_err(|e| BedrockError::Guardrail(e.into_service_error().to_string()))?;

    let configured = resp
        .content_policy()
        .map(|policy| policy.filters())
        .unwrap_or_default();

    for filter in configured {
        info!(
            guardrail_id = id,
            filter = filter.r#type().as_str(),
            input_strength = filter.input_strength().as_str(),
            output_strength = filter.output_strength().as_str(),
            "existing guardrail filter"
        );
    }

    let mismatches = filter_mismatches(configured, safety);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(BedrockError::Guardrail(format!(
            "guardrail {id} does not match the configured safety thresholds: {}",
            mismatches.join("; ")
        )))
    }
}

/// Describe every safety setting that `configured` does not enforce at
/// exactly the expected strength. Extra filters are allowed.
pub fn filter_mismatches(
    configured: &[GuardrailContentFilter],
    safety: &[SafetySetting],
) -> Vec<String> {
    safety
        .iter()
        .filter_map(|setting| {
            let expected_type = filter_type(setting.category);
            let expected = filter_strength(setting.threshold);

            match configured.iter().find(|f| *f.r#type() == expected_type) {
                None => Some(format!("no {} filter", expected_type.as_str())),
                Some(found)
                    if *found.input_strength() != expected
                        || *found.output_strength() != expected =>
                {
                    Some(format!(
                        "{} filter is {}/{}, expected {}",
                        expected_type.as_str(),
                        found.input_strength().as_str(),
                        found.output_strength().as_str(),
                        expected.as_str()
                    ))
                }
                Some(_) => None,
            }
        })
        .collect()
}
