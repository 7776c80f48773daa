//! Local post backend.
//!
//! Each post is a JSON document under `posts/`; attached images are copied
//! into `images/` and referenced by a `file://` URL.

mod error;
mod store;

pub use error::StorageError;
pub use store::{PostStore, StoredImage};
