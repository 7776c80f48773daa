use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::StorageError;
use crate::model::{Attachment, ImageFormat, Post, parse_tags};
use crate::service::{MutationError, MutationResult, NewPost, PostService, PostUpdate};

const POSTS_DIR: &str = "posts";
const IMAGES_DIR: &str = "images";

/// An image written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub id: String,
    pub url: String,
}

/// File-backed post storage.
///
/// Layout under the base path:
/// - `posts/{id}.json`: one document per post
/// - `images/{image_id}.{ext}`: uploaded images
pub struct PostStore {
    base_path: PathBuf,
}

impl PostStore {
    /// Opens a store rooted at `base_path`, creating its directories if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(base_path.join(POSTS_DIR))?;
        std::fs::create_dir_all(base_path.join(IMAGES_DIR))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the document path for a post id.
    ///
    /// Path separators in the id are replaced with `_` so an id taken from a
    /// route cannot escape the posts directory.
    fn post_path(&self, id: &str) -> PathBuf {
        let safe_id = id.replace(['/', '\\'], "_");
        self.base_path
            .join(POSTS_DIR)
            .join(format!("{safe_id}.json"))
    }

    fn image_path(&self, image_id: &str, format: ImageFormat) -> PathBuf {
        let safe_id = image_id.replace(['/', '\\'], "_");
        self.base_path
            .join(IMAGES_DIR)
            .join(format!("{safe_id}.{}", format.extension()))
    }

    /// Copies an attachment into the image directory under a fresh id.
    pub async fn upload_image(&self, attachment: &Attachment) -> Result<StoredImage, StorageError> {
        let format = attachment
            .format()
            .ok_or_else(|| StorageError::UnsupportedImage(attachment.name.clone()))?;
        let id = Uuid::new_v4().to_string();
        let path = self.image_path(&id, format);
        fs::write(&path, &attachment.data).await?;
        debug!(image_id = %id, bytes = attachment.len(), "image stored");
        Ok(StoredImage {
            url: format!("file://{}", path.display()),
            id,
        })
    }

    /// Removes an image by id. Removing an unknown id is not an error.
    pub async fn delete_image(&self, image_id: &str) -> Result<(), StorageError> {
        for &format in ImageFormat::all() {
            match fs::remove_file(self.image_path(image_id, format)).await {
                Ok(()) => {
                    debug!(image_id, "image deleted");
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Writes a post document, replacing any previous version.
    pub async fn save_post(&self, post: &Post) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(post)?;
        fs::write(self.post_path(&post.id), json).await?;
        Ok(())
    }

    /// Loads a post by id.
    pub async fn load_post(&self, id: &str) -> Result<Post, StorageError> {
        match fs::read(self.post_path(id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::PostNotFound(id.into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all posts, newest first.
    ///
    /// Documents that do not parse as a post are skipped with a warning.
    pub async fn list_posts(&self) -> Result<Vec<Post>, StorageError> {
        let mut entries = fs::read_dir(self.base_path.join(POSTS_DIR)).await?;
        let mut posts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let bytes = fs::read(&path).await?;
                match serde_json::from_slice::<Post>(&bytes) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable post");
                    }
                }
            }
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    /// Deletes a post and its image.
    pub async fn delete_post(&self, id: &str) -> Result<(), StorageError> {
        let post = self.load_post(id).await?;
        fs::remove_file(self.post_path(id)).await?;
        if let Some(image_id) = &post.image_id {
            self.discard_image(image_id).await;
        }
        info!(post_id = id, "post deleted");
        Ok(())
    }

    /// Creates a post. The image is uploaded first and removed again if the
    /// document cannot be written.
    pub async fn create(&self, new: NewPost) -> Result<Post, StorageError> {
        let image = match new.file.first() {
            Some(attachment) => Some(self.upload_image(attachment).await?),
            None => None,
        };

        let post = Post {
            id: Uuid::new_v4().to_string(),
            creator: new.user_id,
            caption: new.caption,
            location: new.location,
            tags: parse_tags(&new.tags),
            image_id: image.as_ref().map(|i| i.id.clone()),
            image_url: image.as_ref().map(|i| i.url.clone()),
            created_at: Utc::now(),
        };

        if let Err(e) = self.save_post(&post).await {
            if let Some(image) = &image {
                self.discard_image(&image.id).await;
            }
            return Err(e);
        }

        info!(post_id = %post.id, creator = %post.creator, "post created");
        Ok(post)
    }

    /// Updates a post.
    ///
    /// Without a new attachment the supplied image id and URL are kept. With
    /// one, the new image replaces the old, which is deleted once the document
    /// is written; if the write fails the new image is deleted instead.
    pub async fn update(&self, update: PostUpdate) -> Result<Post, StorageError> {
        let existing = self.load_post(&update.post_id).await?;

        let new_image = match update.file.first() {
            Some(attachment) => Some(self.upload_image(attachment).await?),
            None => None,
        };
        let (image_id, image_url) = match &new_image {
            Some(image) => (Some(image.id.clone()), Some(image.url.clone())),
            None => (update.image_id.clone(), update.image_url.clone()),
        };

        let existing_image_id = existing.image_id;
        let post = Post {
            id: existing.id,
            creator: existing.creator,
            caption: update.caption,
            location: update.location,
            tags: parse_tags(&update.tags),
            image_id,
            image_url,
            created_at: existing.created_at,
        };

        if let Err(e) = self.save_post(&post).await {
            if let Some(image) = &new_image {
                self.discard_image(&image.id).await;
            }
            return Err(e);
        }

        if new_image.is_some()
            && let Some(old_id) = &existing_image_id
        {
            self.discard_image(old_id).await;
        }

        info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    /// Best-effort image removal used for cleanup; failures are only logged.
    async fn discard_image(&self, image_id: &str) {
        if let Err(e) = self.delete_image(image_id).await {
            warn!(image_id, error = %e, "could not remove image");
        }
    }
}

impl PostService for PostStore {
    fn create_post(&self, post: NewPost) -> BoxFuture<'_, MutationResult> {
        async move { self.create(post).await.map_err(MutationError::from) }.boxed()
    }

    fn update_post(&self, update: PostUpdate) -> BoxFuture<'_, MutationResult> {
        async move { self.update(update).await.map_err(MutationError::from) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn make_store() -> (tempfile::TempDir, PostStore) {
        let dir = tempdir().unwrap();
        let store = PostStore::new(dir.path()).unwrap();
        (dir, store)
    }

    fn new_post(file: Vec<Attachment>) -> NewPost {
        NewPost {
            caption: "Sunset over the bay".into(),
            file,
            location: "Beach".into(),
            tags: "sun, sea".into(),
            user_id: "u1".into(),
        }
    }

    fn png(name: &str) -> Attachment {
        Attachment::new(name, b"\x89PNG\r\n".to_vec())
    }

    fn image_count(store: &PostStore) -> usize {
        std::fs::read_dir(store.base_path().join(IMAGES_DIR))
            .unwrap()
            .count()
    }

    /// Replaces the posts directory with a plain file so document writes fail.
    fn break_posts_dir(store: &PostStore) {
        let posts = store.base_path().join(POSTS_DIR);
        std::fs::remove_dir_all(&posts).unwrap();
        std::fs::write(&posts, b"not a directory").unwrap();
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn stores_document_and_image() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(vec![png("sunset.png")])).await.unwrap();

            assert_eq!(post.creator, "u1");
            assert_eq!(post.tags, vec!["sun", "sea"]);
            assert!(post.image_id.is_some());
            let url = post.image_url.clone().unwrap();
            assert!(url.starts_with("file://"), "{url}");
            assert!(url.ends_with(".png"), "{url}");
            assert_eq!(image_count(&store), 1);

            let loaded = store.load_post(&post.id).await.unwrap();
            assert_eq!(loaded, post);
        }

        #[tokio::test]
        async fn without_image() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(Vec::new())).await.unwrap();
            assert_eq!(post.image_id, None);
            assert_eq!(post.image_url, None);
            assert_eq!(image_count(&store), 0);
        }

        #[tokio::test]
        async fn unsupported_image_is_rejected() {
            let (_dir, store) = make_store();
            let err = store
                .create(new_post(vec![Attachment::new("notes.txt", vec![1])]))
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::UnsupportedImage(name) if name == "notes.txt"));
            assert!(store.list_posts().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn failed_write_removes_uploaded_image() {
            let (_dir, store) = make_store();
            break_posts_dir(&store);
            let result = store.create(new_post(vec![png("sunset.png")])).await;
            assert!(result.is_err());
            assert_eq!(image_count(&store), 0);
        }
    }

    mod update {
        use super::*;

        #[tokio::test]
        async fn keeps_image_when_no_new_file() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(vec![png("sunset.png")])).await.unwrap();

            let updated = store
                .update(PostUpdate {
                    caption: "Sunset, take two".into(),
                    file: Vec::new(),
                    location: "Pier".into(),
                    tags: "a,b".into(),
                    post_id: post.id.clone(),
                    image_id: post.image_id.clone(),
                    image_url: post.image_url.clone(),
                })
                .await
                .unwrap();

            assert_eq!(updated.caption, "Sunset, take two");
            assert_eq!(updated.location, "Pier");
            assert_eq!(updated.tags, vec!["a", "b"]);
            assert_eq!(updated.image_id, post.image_id);
            assert_eq!(updated.image_url, post.image_url);
            assert_eq!(updated.created_at, post.created_at);
            assert_eq!(updated.creator, post.creator);
            assert_eq!(image_count(&store), 1);
        }

        #[tokio::test]
        async fn replaced_image_is_removed_even_if_caller_omits_it() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(vec![png("old.png")])).await.unwrap();

            let updated = store
                .update(PostUpdate {
                    caption: post.caption.clone(),
                    file: vec![png("new.png")],
                    location: post.location.clone(),
                    tags: "sun".into(),
                    post_id: post.id.clone(),
                    image_id: None,
                    image_url: None,
                })
                .await
                .unwrap();

            assert_ne!(updated.image_id, post.image_id);
            assert_eq!(image_count(&store), 1);
        }

        #[tokio::test]
        async fn new_file_replaces_old_image() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(vec![png("old.png")])).await.unwrap();

            let updated = store
                .update(PostUpdate {
                    caption: post.caption.clone(),
                    file: vec![png("new.png")],
                    location: post.location.clone(),
                    tags: post.joined_tags(),
                    post_id: post.id.clone(),
                    image_id: post.image_id.clone(),
                    image_url: post.image_url.clone(),
                })
                .await
                .unwrap();

            assert_ne!(updated.image_id, post.image_id);
            assert_eq!(image_count(&store), 1);
            let loaded = store.load_post(&post.id).await.unwrap();
            assert_eq!(loaded.image_id, updated.image_id);
        }

        #[tokio::test]
        async fn missing_post_is_not_found() {
            let (_dir, store) = make_store();
            let err = store
                .update(PostUpdate {
                    caption: "Nothing here".into(),
                    file: Vec::new(),
                    location: "Nowhere".into(),
                    tags: String::new(),
                    post_id: "missing".into(),
                    image_id: None,
                    image_url: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::PostNotFound(id) if id == "missing"));
        }
    }

    mod listing {
        use super::*;

        fn post_at(id: &str, year: i32) -> Post {
            Post {
                id: id.into(),
                creator: "u1".into(),
                caption: format!("Post {id}"),
                location: "Here".into(),
                tags: Vec::new(),
                image_id: None,
                image_url: None,
                created_at: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            }
        }

        #[tokio::test]
        async fn empty_store_lists_nothing() {
            let (_dir, store) = make_store();
            assert!(store.list_posts().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn newest_first() {
            let (_dir, store) = make_store();
            store.save_post(&post_at("older", 2024)).await.unwrap();
            store.save_post(&post_at("newer", 2026)).await.unwrap();
            store.save_post(&post_at("middle", 2025)).await.unwrap();

            let ids: Vec<String> = store
                .list_posts()
                .await
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(ids, vec!["newer", "middle", "older"]);
        }

        #[tokio::test]
        async fn skips_documents_that_do_not_parse() {
            let (_dir, store) = make_store();
            store.save_post(&post_at("good", 2026)).await.unwrap();
            std::fs::write(store.base_path().join(POSTS_DIR).join("stray.json"), b"{not json")
                .unwrap();

            let posts = store.list_posts().await.unwrap();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].id, "good");
        }

        #[tokio::test]
        async fn load_missing_post() {
            let (_dir, store) = make_store();
            let err = store.load_post("nope").await.unwrap_err();
            assert!(matches!(err, StorageError::PostNotFound(_)));
        }

        #[test]
        fn id_with_separators_stays_in_posts_dir() {
            let (_dir, store) = make_store();
            let path = store.post_path("../escape");
            assert_eq!(path.parent().unwrap(), store.base_path().join(POSTS_DIR));
        }

        #[tokio::test]
        async fn delete_removes_document_and_image() {
            let (_dir, store) = make_store();
            let post = store.create(new_post(vec![png("gone.png")])).await.unwrap();
            store.delete_post(&post.id).await.unwrap();
            assert!(store.list_posts().await.unwrap().is_empty());
            assert_eq!(image_count(&store), 0);
        }

        #[tokio::test]
        async fn delete_unknown_image_is_ok() {
            let (_dir, store) = make_store();
            assert!(store.delete_image("never-stored").await.is_ok());
        }
    }

    mod service {
        use super::*;

        #[tokio::test]
        async fn create_post_through_trait() {
            let (_dir, store) = make_store();
            let service: &dyn PostService = &store;
            let post = service.create_post(new_post(Vec::new())).await.unwrap();
            assert_eq!(store.load_post(&post.id).await.unwrap(), post);
        }

        #[tokio::test]
        async fn update_missing_post_maps_to_not_found() {
            let (_dir, store) = make_store();
            let service: &dyn PostService = &store;
            let err = service
                .update_post(PostUpdate {
                    caption: "Nothing here".into(),
                    file: Vec::new(),
                    location: "Nowhere".into(),
                    tags: String::new(),
                    post_id: "missing".into(),
                    image_id: None,
                    image_url: None,
                })
                .await
                .unwrap_err();
            assert_eq!(err, MutationError::NotFound("missing".into()));
        }
    }
}
