//! Request-independent chat logic. Handlers translate HTTP into calls on
//! these services and their outcomes back into responses.

pub mod chat;
pub mod error;
pub mod history;

pub use chat::{ChatReply, ChatService, ChatTurn, StorageOutcome};
pub use error::ServiceError;
pub use history::HistoryService;
