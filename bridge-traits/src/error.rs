use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Remote service error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Name already in use: {0}")]
    NameConflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether a user-initiated retry of the same operation is meaningful.
    ///
    /// Name conflicts require a different name, not a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, BridgeError::NameConflict(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
