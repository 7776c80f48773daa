use serde::{Deserialize, Serialize};

/// The signed-in user on whose behalf posts are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new("local", "Local User")
    }
}
