/// Why a create or update mutation did not produce a post.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The post to update does not exist.
    #[error("post not found: {0}")]
    NotFound(String),

    /// The image could not be stored.
    #[error("image upload failed: {0}")]
    Upload(String),

    /// The backend rejected or failed the write.
    #[error("backend error: {0}")]
    Backend(String),
}
