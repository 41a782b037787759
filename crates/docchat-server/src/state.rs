use std::sync::Arc;

use tracing::{info, warn};

use docchat_auth::SessionVerifier;
use docchat_bedrock::extract::BedrockDocumentExtractor;
use docchat_bedrock::guardrail::{self, GuardrailRef};
use docchat_bedrock::{BedrockModel, LanguageModel};
use docchat_core::models::generation::GenerationConfig;
use docchat_extract::pdf::PdfTextExtractor;
use docchat_extract::DocumentExtractor;
use docchat_storage::{InteractionStore, MemoryInteractionStore, S3InteractionStore};

use crate::config::{ExtractorBackend, GuardrailSource, ServerConfig, StorageBackend};
use crate::service::{ChatService, HistoryService};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub history: Arc<HistoryService>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub verifier: Arc<SessionVerifier>,
    pub session_cookie: String,
}

impl AppState {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn InteractionStore>,
        extractor: Arc<dyn DocumentExtractor>,
        verifier: SessionVerifier,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            chat: Arc::new(ChatService::new(model, store.clone(), GenerationConfig::default())),
            history: Arc::new(HistoryService::new(store)),
            extractor,
            verifier: Arc::new(verifier),
            session_cookie: session_cookie.into(),
        }
    }

    /// Wire the AWS-backed services described by `config`. Provisions the
    /// safety guardrail when no existing one is named.
    pub async fn from_config(config: &ServerConfig) -> eyre::Result<Self> {
        let sdk = docchat_bedrock::client::load_config(&config.region).await;
        let runtime = docchat_bedrock::client::build_runtime_client(&sdk);
        let generation = GenerationConfig::default();

        let store: Arc<dyn InteractionStore> = match config.storage {
            StorageBackend::S3 => {
                let s3 = docchat_storage::client::build_client(&sdk);
                Arc::new(S3InteractionStore::new(s3, &config.bucket))
            }
            StorageBackend::Memory => {
                warn!("using in-memory interaction store; history is lost on restart");
                Arc::new(MemoryInteractionStore::new())
            }
        };

        let guardrail = match &config.guardrail {
            GuardrailSource::Existing { id, version } => GuardrailRef {
                id: id.clone(),
                version: version.clone(),
            },
            GuardrailSource::Provision { name } => {
                guardrail::ensure_guardrail(&sdk, name, &generation.safety).await?
            }
        };
        info!(guardrail_id = %guardrail.id, version = %guardrail.version, "safety guardrail attached");

        let model = BedrockModel::new(runtime.clone(), &config.model_id, Some(guardrail));

        let extractor: Arc<dyn DocumentExtractor> = match &config.extractor {
            ExtractorBackend::Local => Arc::new(PdfTextExtractor),
            ExtractorBackend::Bedrock { model_id } => {
                Arc::new(BedrockDocumentExtractor::new(runtime, model_id))
            }
        };

        let verifier = config.auth.verifier()?;

        Ok(Self {
            chat: Arc::new(ChatService::new(Arc::new(model), store.clone(), generation)),
            history: Arc::new(HistoryService::new(store)),
            extractor,
            verifier: Arc::new(verifier),
            session_cookie: config.auth.session_cookie.clone(),
        })
    }
}
