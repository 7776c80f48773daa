use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static POST_DETAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/posts/([^/]+)$").expect("valid hardcoded regex"));

static UPDATE_POST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/update-post/([^/]+)$").expect("valid hardcoded regex"));

const CREATE_POST_PATH: &str = "/posts/create-post";

/// Client-side navigation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// The post feed, `/`.
    Home,
    /// The create form, `/posts/create-post`.
    CreatePost,
    /// A single post, `/posts/{id}`.
    PostDetail(String),
    /// The edit form of a post, `/update-post/{id}`.
    UpdatePost(String),
}

impl Route {
    /// Returns the path string for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::CreatePost => CREATE_POST_PATH.to_string(),
            Self::PostDetail(id) => format!("/posts/{id}"),
            Self::UpdatePost(id) => format!("/update-post/{id}"),
        }
    }

    /// Parses a path back into a route.
    ///
    /// `/posts/create-post` is the create form, never a post with id `create-post`.
    pub fn parse(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::Home);
        }
        if path == CREATE_POST_PATH {
            return Some(Self::CreatePost);
        }
        if let Some(caps) = POST_DETAIL_RE.captures(path) {
            return Some(Self::PostDetail(caps[1].to_string()));
        }
        UPDATE_POST_RE
            .captures(path)
            .map(|caps| Self::UpdatePost(caps[1].to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
