use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pagination::{PageRequest, SortOrder};

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown post status '{s}'"))
    }
}

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub cover: Option<String>,
    pub status: PostStatus,
    pub posted_by: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: new_post.user_id,
            title: new_post.title,
            content: new_post.content,
            cover: new_post.cover,
            status: new_post.status,
            posted_by: new_post.posted_by,
            posted_at: new_post.posted_at,
            tags: new_post.tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn was_published(&self) -> bool {
        self.posted_at.is_some()
    }

    /// Apply a partial update in place. Publication fields are only ever
    /// filled, never overwritten.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(cover) = changes.cover {
            self.cover = Some(cover);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if self.posted_at.is_none() {
            self.posted_by = changes.posted_by.or(self.posted_by.take());
            self.posted_at = changes.posted_at;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields required to persist a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub cover: Option<String>,
    pub status: PostStatus,
    pub posted_by: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Partial update of a post; `None` leaves the column untouched.
/// `tags: Some(..)` replaces the full tag set.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
    pub posted_by: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Validated post listing query.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<PostStatus>,
    pub sort: SortOrder,
}

impl PostQuery {
    /// Case-insensitive match used by non-SQL backends: title substring or
    /// exact tag name.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(status) = self.status {
            if post.status != status {
                return false;
            }
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.tags.iter().any(|t| t.to_lowercase() == needle)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new(NewPost {
            user_id: Uuid::new_v4(),
            title: "Hello Rust".to_string(),
            content: "body".to_string(),
            cover: None,
            status: PostStatus::Draft,
            posted_by: None,
            posted_at: None,
            tags: vec!["Rust".to_string(), "web".to_string()],
        })
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("PUBLISHED".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("published".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_apply_fills_publication_once() {
        let mut post = draft();
        let first = Utc::now();

        post.apply(PostChanges {
            status: Some(PostStatus::Published),
            posted_by: Some("John Doe".to_string()),
            posted_at: Some(first),
            ..Default::default()
        });
        assert_eq!(post.posted_at, Some(first));
        assert_eq!(post.posted_by.as_deref(), Some("John Doe"));

        post.apply(PostChanges {
            posted_by: Some("Someone Else".to_string()),
            posted_at: Some(Utc::now()),
            ..Default::default()
        });
        assert_eq!(post.posted_at, Some(first));
        assert_eq!(post.posted_by.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_query_matches_title_or_tag() {
        let post = draft();

        let by_title = PostQuery {
            search: Some("hello".to_string()),
            ..Default::default()
        };
        let by_tag = PostQuery {
            search: Some("rust".to_string()),
            ..Default::default()
        };
        let partial_tag = PostQuery {
            search: Some("we".to_string()),
            ..Default::default()
        };
        let wrong_status = PostQuery {
            status: Some(PostStatus::Published),
            ..Default::default()
        };

        assert!(by_title.matches(&post));
        assert!(by_tag.matches(&post));
        assert!(!partial_tag.matches(&post));
        assert!(!wrong_status.matches(&post));
    }
}
