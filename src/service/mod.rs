//! Collaborators the post form depends on: the post backend, the current
//! user, the notification sink and the navigator.
//!
//! Everything is passed in explicitly so the form can be driven without a
//! terminal.

mod error;
mod route;

use futures::future::BoxFuture;

use crate::model::{Attachment, Post, User};

pub use error::MutationError;
pub use route::Route;

/// Message shown when a mutation fails.
pub const RETRY_MESSAGE: &str = "Try again";

/// Outcome of a create or update mutation.
pub type MutationResult = Result<Post, MutationError>;

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub caption: String,
    pub file: Vec<Attachment>,
    pub location: String,
    /// Comma-separated tags, as typed.
    pub tags: String,
    pub user_id: String,
}

/// Input for updating a post.
///
/// `image_id` and `image_url` describe the image currently attached so the
/// backend can keep it when `file` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub caption: String,
    pub file: Vec<Attachment>,
    pub location: String,
    /// Comma-separated tags, as typed.
    pub tags: String,
    pub post_id: String,
    pub image_id: Option<String>,
    pub image_url: Option<String>,
}

/// Remote post mutations.
pub trait PostService {
    fn create_post(&self, post: NewPost) -> BoxFuture<'_, MutationResult>;
    fn update_post(&self, update: PostUpdate) -> BoxFuture<'_, MutationResult>;
}

/// Supplies the identifier of the active user.
pub trait CurrentUser {
    fn user_id(&self) -> &str;
}

impl CurrentUser for User {
    fn user_id(&self) -> &str {
        &self.id
    }
}

/// Transient user-facing feedback.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Client-side navigation.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}
