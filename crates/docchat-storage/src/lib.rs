//! docchat-storage
//!
//! Persistence for interaction records. Thin wrapper around the AWS S3 SDK,
//! plus an in-memory store for local development and tests.

pub mod client;
pub mod error;
pub mod interactions;
pub mod json;
pub mod memory;
pub mod objects;

pub use interactions::{InteractionStore, S3InteractionStore};
pub use memory::MemoryInteractionStore;
