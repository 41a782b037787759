pub mod generation;
pub mod interaction;
pub mod message;
