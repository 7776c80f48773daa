use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-authored post as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Identifier of the user who created the post.
    pub creator: String,
    pub caption: String,
    pub location: String,
    pub tags: Vec<String>,
    /// Storage identifier of the attached image, if any.
    pub image_id: Option<String>,
    /// Public URL of the attached image, if any.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns the tags flattened into the comma-separated form used by the editor.
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}

/// Splits a comma-separated tag string into individual tags.
///
/// All whitespace is removed and empty entries are dropped, so
/// `"sun, sea ,,sand"` yields `["sun", "sea", "sand"]`.
pub fn parse_tags(tags: &str) -> Vec<String> {
    let compact: String = tags.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
