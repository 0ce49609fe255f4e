use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether the error came from the caller's context rather than the remote side.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, BridgeError::Cancelled | BridgeError::DeadlineExceeded)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
