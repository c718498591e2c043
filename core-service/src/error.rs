use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),
}

impl CoreError {
    /// The library error kind, if this wraps a library failure
    pub fn library_kind(&self) -> Option<core_library::ErrorKind> {
        match self {
            CoreError::Library(err) => Some(err.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
