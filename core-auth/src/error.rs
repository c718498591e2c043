use thiserror::Error;

use crate::types::Role;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Insufficient privileges: {required} role required, principal has {actual}")]
    InsufficientRole { required: Role, actual: Role },

    #[error("Invalid session claims: {0}")]
    InvalidClaims(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
