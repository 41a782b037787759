use std::sync::Arc;

use tracing::{error, info};

use docchat_core::history::expand_records;
use docchat_core::models::message::DisplayMessage;
use docchat_storage::InteractionStore;

use super::error::ServiceError;

/// Rebuilds a caller's conversation from their stored interactions.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn InteractionStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, caller: Option<&str>) -> Result<Vec<DisplayMessage>, ServiceError> {
        let owner_id = caller.ok_or(ServiceError::Unauthorized)?;

        let records = self.store.list_for_owner(owner_id).await.map_err(|e| {
            error!(owner_id, error = %e, "failed to list interactions");
            ServiceError::Internal(e.to_string())
        })?;

        info!(owner_id, records = records.len(), "history loaded");

        Ok(expand_records(&records))
    }
}
