//! docchat-core
//!
//! Pure domain types, prompt construction, history expansion and the storage
//! key layout. This is the shared vocabulary of the DocChat system and has no
//! AWS SDK dependency.

pub mod error;
pub mod history;
pub mod keys;
pub mod models;
pub mod prompt;
pub mod transcript;
