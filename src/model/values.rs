use std::fmt;

use super::attachment::Attachment;
use super::post::Post;

/// The editable fields of a post form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Caption,
    File,
    Location,
    Tags,
}

const ALL_FIELDS: [Field; 4] = [Field::Caption, Field::File, Field::Location, Field::Tags];

impl Field {
    /// Returns every field in display order.
    pub fn all() -> &'static [Field] {
        &ALL_FIELDS
    }

    /// Machine name of the field, as used in error maps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::File => "file",
            Self::Location => "location",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current contents of a post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub caption: String,
    /// Selected images; zero or one is expected.
    pub file: Vec<Attachment>,
    pub location: String,
    /// Comma-separated tags.
    pub tags: String,
}

impl FormValues {
    /// Seeds values from an existing post. The file list starts empty so an
    /// unchanged image is left alone on update.
    pub fn from_post(post: &Post) -> Self {
        Self {
            caption: post.caption.clone(),
            file: Vec::new(),
            location: post.location.clone(),
            tags: post.joined_tags(),
        }
    }

    /// Returns the text of a text field, or `None` for [`Field::File`].
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Caption => Some(&self.caption),
            Field::Location => Some(&self.location),
            Field::Tags => Some(&self.tags),
            Field::File => None,
        }
    }
}
