use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    /// A folder load failed. The breadcrumb stack is preserved; `retry()`
    /// re-issues the same load.
    #[error("Folder load failed: {message}")]
    Load { message: String, retryable: bool },

    /// Automatic redirects exceeded the depth guard, which indicates a
    /// cyclic or corrupt remote structure.
    #[error("Auto-redirect depth exceeded after {0} redirects")]
    TooManyRedirects(usize),

    /// A breadcrumb jump addressed an index outside the stack.
    #[error("Breadcrumb index {0} out of range")]
    InvalidBreadcrumb(usize),
}

impl From<bridge_traits::error::BridgeError> for NavError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        NavError::Load {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
