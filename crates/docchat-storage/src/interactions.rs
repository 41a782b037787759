//! Append-only interaction log.
//!
//! Every read and write is scoped to one owner: the owner id is part of the
//! object key, so listing an owner's prefix can only return that owner's
//! records.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::{info, warn};
use uuid::Uuid;

use docchat_core::keys;
use docchat_core::models::interaction::{InteractionRecord, NewInteraction};

use crate::error::StorageError;
use crate::json;
use crate::objects;

/// Storage for interaction records.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Persist a new record, assigning its id and creation timestamp.
    async fn insert(&self, new: NewInteraction) -> Result<InteractionRecord, StorageError>;

    /// All records owned by `owner_id`, oldest first.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<InteractionRecord>, StorageError>;
}

/// Interaction records stored as one JSON object each in S3.
#[derive(Clone)]
pub struct S3InteractionStore {
    client: Client,
    bucket: String,
}

impl S3InteractionStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl InteractionStore for S3InteractionStore {
    async fn insert(&self, new: NewInteraction) -> Result<InteractionRecord, StorageError> {
        let record = new.into_record(Uuid::new_v4(), jiff::Timestamp::now());
        let key = keys::interaction(&record.owner_id, record.created_at, record.id)?;

        json::create_json(&self.client, &self.bucket, &key, &record).await?;

        info!(record_id = %record.id, is_error = record.is_error, "interaction stored");
        Ok(record)
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<InteractionRecord>, StorageError> {
        let prefix = keys::owner_interactions_prefix(owner_id)?;
        let object_keys = objects::list_objects(&self.client, &self.bucket, &prefix).await?;

        let mut records = Vec::with_capacity(object_keys.len());
        for key in &object_keys {
            let record: InteractionRecord = json::load_json(&self.client, &self.bucket, key).await?;
            if record.owner_id != owner_id {
                warn!(key = %key, "skipping interaction stored under another owner's prefix");
                continue;
            }
            records.push(record);
        }

        // Keys are already chronological; the stable sort only guards
        // against hand-written objects.
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}
