use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use docchat_core::keys;
use docchat_core::models::interaction::{InteractionRecord, NewInteraction};

use crate::error::StorageError;
use crate::interactions::InteractionStore;

/// Process-local interaction store for development and tests.
///
/// Creation timestamps never go backwards, so records inserted one after
/// another list in insertion order.
#[derive(Debug, Default)]
pub struct MemoryInteractionStore {
    records: Mutex<Vec<InteractionRecord>>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record across all owners, in insertion order.
    pub async fn snapshot(&self) -> Vec<InteractionRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn insert(&self, new: NewInteraction) -> Result<InteractionRecord, StorageError> {
        keys::validate_owner(&new.owner_id)?;

        let mut records = self.records.lock().await;
        let now = jiff::Timestamp::now();
        let created_at = records
            .last()
            .map(|last| last.created_at.max(now))
            .unwrap_or(now);

        let record = new.into_record(Uuid::new_v4(), created_at);
        records.push(record.clone());
        Ok(record)
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<InteractionRecord>, StorageError> {
        keys::validate_owner(owner_id)?;

        let records = self.records.lock().await;
        let mut owned: Vec<InteractionRecord> = records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|r| r.created_at);
        Ok(owned)
    }
}
