use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    /// The lazy photos-folder creation failed; no photo was submitted.
    #[error("Failed to prepare the photos folder: {0}")]
    Destination(bridge_traits::error::BridgeError),

    /// A queue operation addressed an index outside the queue.
    #[error("Photo index {0} out of range")]
    InvalidIndex(usize),
}

pub type Result<T> = std::result::Result<T, UploadError>;
