use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid bridge or logging configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host bridge was neither injected nor defaulted.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// A process-wide logger (tracing subscriber or `log` facade) could not
    /// be installed, usually because another one already is.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
