//! Error types for the drive provider

use thiserror::Error;

/// Drive provider errors
#[derive(Error, Debug)]
pub enum DriveError {
    /// The remote service returned a non-2xx status
    #[error("Drive API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The remote rejected a rename because the name is already taken (409)
    #[error("Name already in use: {name}")]
    NameConflict { name: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Bridge error
    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

/// Result type for drive operations
pub type Result<T> = std::result::Result<T, DriveError>;

impl From<DriveError> for bridge_traits::error::BridgeError {
    fn from(error: DriveError) -> Self {
        match error {
            DriveError::Api { status, message } => {
                bridge_traits::error::BridgeError::Remote { status, message }
            }
            DriveError::NameConflict { name } => {
                bridge_traits::error::BridgeError::NameConflict(name)
            }
            DriveError::Parse(msg) => {
                bridge_traits::error::BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            DriveError::Bridge(e) => e,
        }
    }
}
