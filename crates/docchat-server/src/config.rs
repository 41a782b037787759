//! Startup configuration, read once from the environment.

use std::fmt;
use std::net::SocketAddr;

use eyre::{eyre, WrapErr};

use docchat_auth::SessionVerifier;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET: &str = "docchat";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_GUARDRAIL_VERSION: &str = "DRAFT";
pub const DEFAULT_GUARDRAIL_NAME: &str = "docchat-safety";
pub const DEFAULT_SESSION_COOKIE: &str = "docchat-session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub region: String,
    pub storage: StorageBackend,
    pub bucket: String,
    pub model_id: String,
    pub extractor: ExtractorBackend,
    pub guardrail: GuardrailSource,
    pub auth: AuthSettings,
    pub cors_origin: Option<String>,
    pub runtime: Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    /// Records live in process memory and vanish on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorBackend {
    Local,
    Bedrock { model_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardrailSource {
    Existing { id: String, version: String },
    /// Find the guardrail by name, creating it if needed.
    Provision { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub key: VerificationKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub session_cookie: String,
}

#[derive(Clone, PartialEq, Eq)]
pub enum VerificationKey {
    Secret(String),
    PublicKeyPem(String),
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationKey::Secret(_) => f.write_str("Secret(<redacted>)"),
            VerificationKey::PublicKeyPem(_) => f.write_str("PublicKeyPem(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Standalone,
    Lambda,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = var("DOCCHAT_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .wrap_err("DOCCHAT_BIND_ADDR is not a valid socket address")?;

        let storage = match var("DOCCHAT_STORAGE").as_deref() {
            None | Some("s3") => StorageBackend::S3,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(eyre!("DOCCHAT_STORAGE must be `s3` or `memory`, got `{other}`"));
            }
        };

        let model_id = var("DOCCHAT_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        let extractor = match var("DOCCHAT_EXTRACTOR").as_deref() {
            None | Some("local") => ExtractorBackend::Local,
            Some("bedrock") => ExtractorBackend::Bedrock {
                model_id: var("DOCCHAT_EXTRACTION_MODEL_ID").unwrap_or_else(|| model_id.clone()),
            },
            Some(other) => {
                return Err(eyre!("DOCCHAT_EXTRACTOR must be `local` or `bedrock`, got `{other}`"));
            }
        };

        let guardrail = match var("DOCCHAT_GUARDRAIL_ID") {
            Some(id) => GuardrailSource::Existing {
                id,
                version: var("DOCCHAT_GUARDRAIL_VERSION")
                    .unwrap_or_else(|| DEFAULT_GUARDRAIL_VERSION.to_string()),
            },
            None => GuardrailSource::Provision {
                name: var("DOCCHAT_GUARDRAIL_NAME")
                    .unwrap_or_else(|| DEFAULT_GUARDRAIL_NAME.to_string()),
            },
        };

        let key = match (var("DOCCHAT_JWT_SECRET"), var("DOCCHAT_JWT_PUBLIC_KEY")) {
            (Some(_), Some(_)) => {
                return Err(eyre!(
                    "set only one of DOCCHAT_JWT_SECRET and DOCCHAT_JWT_PUBLIC_KEY"
                ));
            }
            (Some(secret), None) => VerificationKey::Secret(secret),
            (None, Some(pem)) => VerificationKey::PublicKeyPem(pem),
            (None, None) => {
                return Err(eyre!(
                    "one of DOCCHAT_JWT_SECRET or DOCCHAT_JWT_PUBLIC_KEY is required"
                ));
            }
        };

        Ok(Self {
            bind_addr,
            region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            storage,
            bucket: var("DOCCHAT_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            model_id,
            extractor,
            guardrail,
            auth: AuthSettings {
                key,
                issuer: var("DOCCHAT_JWT_ISSUER"),
                audience: var("DOCCHAT_JWT_AUDIENCE"),
                session_cookie: var("DOCCHAT_SESSION_COOKIE")
                    .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            },
            cors_origin: var("DOCCHAT_CORS_ORIGIN"),
            runtime: if var("AWS_LAMBDA_RUNTIME_API").is_some() {
                Runtime::Lambda
            } else {
                Runtime::Standalone
            },
        })
    }
}

impl AuthSettings {
    pub fn verifier(&self) -> eyre::Result<SessionVerifier> {
        let issuer = self.issuer.as_deref();
        let audience = self.audience.as_deref();

        match &self.key {
            VerificationKey::Secret(secret) => {
                Ok(SessionVerifier::hs256(secret.as_bytes(), issuer, audience))
            }
            VerificationKey::PublicKeyPem(pem) => SessionVerifier::rs256_pem(pem.as_bytes(), issuer, audience)
                .wrap_err("DOCCHAT_JWT_PUBLIC_KEY is not a valid RSA public key"),
        }
    }
}
