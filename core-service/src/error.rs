use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("No photos destination is resolved for the current location")]
    NoUploadTarget,

    #[error("Navigation error: {0}")]
    Nav(#[from] core_nav::NavError),

    #[error("Upload error: {0}")]
    Upload(#[from] core_upload::UploadError),

    #[error("Image processing error: {0}")]
    Imaging(#[from] core_imaging::ImagingError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
