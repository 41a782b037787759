use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid owner id: {0:?}")]
    InvalidOwner(String),
}
