use thiserror::Error;

/// Errors raised while configuring the runtime or bootstrapping the client.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is missing or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge implementation was not supplied and has no default
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn capability_missing(
        capability: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::CapabilityMissing {
            capability: capability.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
