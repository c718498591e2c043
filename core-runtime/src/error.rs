use thiserror::Error;

/// Errors raised while wiring up the core.
#[derive(Error, Debug)]
pub enum Error {
    /// A tunable is out of range or a subscriber could not be installed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge was not injected and no default exists
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
