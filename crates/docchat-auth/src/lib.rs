//! docchat-auth
//!
//! Session token verification. Tokens are issued by the external auth
//! provider; this crate only answers "who is the caller?".

pub mod error;
pub mod jwt;

pub use jwt::{SessionClaims, SessionVerifier};
