//! Caller checks for administrative endpoints.

pub mod auth;

use thiserror::Error as ThisError;

///
/// AccessError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum AccessError {
    #[error("access denied: {0}")]
    Denied(String),
}
