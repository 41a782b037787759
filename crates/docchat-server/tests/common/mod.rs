//! Test doubles and request helpers shared by the server tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use serde_json::Value;

use docchat_auth::{SessionClaims, SessionVerifier};
use docchat_bedrock::error::BedrockError;
use docchat_bedrock::LanguageModel;
use docchat_core::models::generation::{GenerationConfig, ModelOutput};
use docchat_core::models::interaction::{InteractionRecord, NewInteraction};
use docchat_extract::error::ExtractError;
use docchat_extract::DocumentExtractor;
use docchat_server::state::AppState;
use docchat_storage::error::StorageError;
use docchat_storage::{InteractionStore, MemoryInteractionStore};

pub const SECRET: &[u8] = b"server-test-secret";
pub const COOKIE_NAME: &str = "docchat-session";

/// Model that replays scripted results in order, then replies "ok".
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<ModelOutput, String>>>,
    prompts: Mutex<Vec<String>>,
    configs: Mutex<Vec<GenerationConfig>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<ModelOutput, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(ModelOutput::text(text))])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn configs(&self) -> Vec<GenerationConfig> {
        self.configs.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<ModelOutput, BedrockError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.configs.lock().unwrap().push(config.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(BedrockError::Invocation(message)),
            None => Ok(ModelOutput::text("ok")),
        }
    }
}

/// Store whose writes always fail; reads return nothing.
#[derive(Default)]
pub struct BrokenStore {
    pub attempts: Mutex<Vec<NewInteraction>>,
}

#[async_trait]
impl InteractionStore for BrokenStore {
    async fn insert(&self, new: NewInteraction) -> Result<InteractionRecord, StorageError> {
        self.attempts.lock().unwrap().push(new);
        Err(StorageError::PutObject("bucket unavailable".to_string()))
    }

    async fn list_for_owner(&self, _owner_id: &str) -> Result<Vec<InteractionRecord>, StorageError> {
        Err(StorageError::ListObjects("bucket unavailable".to_string()))
    }
}

/// Extractor that returns fixed text or a fixed error, and records what it
/// was given.
pub struct FakeExtractor {
    result: Result<String, fn(String) -> ExtractError>,
    pub calls: Mutex<Vec<(usize, String)>>,
}

impl FakeExtractor {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(make: fn(String) -> ExtractError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(make),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DocumentExtractor for FakeExtractor {
    async fn extract_text(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ExtractError> {
        self.calls.lock().unwrap().push((bytes.len(), filename.to_string()));
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make("bad xref table".to_string())),
        }
    }
}

pub fn verifier() -> SessionVerifier {
    SessionVerifier::hs256(SECRET, None, None)
}

pub fn token_for(sub: &str) -> String {
    let claims = SessionClaims {
        sub: sub.to_string(),
        exp: get_current_timestamp() + 600,
        iat: Some(get_current_timestamp()),
        iss: None,
        email: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

pub fn expired_token_for(sub: &str) -> String {
    let claims = SessionClaims {
        sub: sub.to_string(),
        exp: get_current_timestamp() - 3600,
        iat: None,
        iss: None,
        email: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

pub struct Harness {
    pub state: AppState,
    pub model: Arc<ScriptedModel>,
    pub store: Arc<MemoryInteractionStore>,
    pub extractor: Arc<FakeExtractor>,
}

pub fn harness(model: Arc<ScriptedModel>, extractor: Arc<FakeExtractor>) -> Harness {
    let store = Arc::new(MemoryInteractionStore::new());
    let state = AppState::new(
        model.clone(),
        store.clone(),
        extractor.clone(),
        verifier(),
        COOKIE_NAME,
    );
    Harness {
        state,
        model,
        store,
        extractor,
    }
}

pub fn json_request(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub const BOUNDARY: &str = "docchat-test-boundary";

/// A multipart body with a single file part.
pub fn multipart_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
