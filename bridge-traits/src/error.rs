use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("HTTP backend already initialized")]
    AlreadyInitialized,

    #[error("HTTP backend not initialized")]
    NotInitialized,

    #[error("HTTP backend initialization failed: {0}")]
    Initialization(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),
}

impl BridgeError {
    /// Whether this is the error a backend returns for a repeated activation.
    ///
    /// Callers that activate idempotently match on this and discard it.
    pub fn is_already_initialized(&self) -> bool {
        matches!(self, Self::AlreadyInitialized)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
