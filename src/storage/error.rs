use crate::service::MutationError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No post document exists for the given id.
    #[error("post not found: {0}")]
    PostNotFound(String),

    /// The attachment is not one of the supported image formats.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
}

impl From<StorageError> for MutationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PostNotFound(id) => Self::NotFound(id),
            StorageError::UnsupportedImage(name) => Self::Upload(name),
            other => Self::Backend(other.to_string()),
        }
    }
}
