//! Storage key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of interaction records in the DocChat bucket:
//!
//! ```text
//! interactions/{owner_id}/{created_at_ns:020}-{id}.json
//! ```
//!
//! The zero-padded nanosecond prefix makes lexicographic key order equal to
//! chronological order within one owner's prefix.

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::CoreError;

pub const INTERACTIONS_PREFIX: &str = "interactions/";

const MAX_OWNER_LEN: usize = 256;

/// Reject owner ids that would escape or alias another owner's prefix.
pub fn validate_owner(owner_id: &str) -> Result<(), CoreError> {
    let valid = !owner_id.is_empty()
        && owner_id.len() <= MAX_OWNER_LEN
        && owner_id != "."
        && owner_id != ".."
        && !owner_id.chars().any(|c| c == '/' || c.is_control());

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidOwner(owner_id.to_string()))
    }
}

pub fn owner_interactions_prefix(owner_id: &str) -> Result<String, CoreError> {
    validate_owner(owner_id)?;
    Ok(format!("{INTERACTIONS_PREFIX}{owner_id}/"))
}

pub fn interaction(owner_id: &str, created_at: Timestamp, id: Uuid) -> Result<String, CoreError> {
    let prefix = owner_interactions_prefix(owner_id)?;
    let nanos = created_at.as_nanosecond().max(0);
    Ok(format!("{prefix}{nanos:020}-{id}.json"))
}
