use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use super::user::User;
use crate::error::DomainError;
use crate::validation::{EXCERPT_MAX_CHARS, TITLE_MAX_CHARS};

/// Topic a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tech,
    Lifestyle,
    Business,
    Travel,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Tech,
        Category::Lifestyle,
        Category::Business,
        Category::Travel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Lifestyle => "lifestyle",
            Category::Business => "business",
            Category::Travel => "travel",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("'{}' is not a valid category", s)))
    }
}

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::validation(format!(
                "'{}' is not a valid status",
                other
            ))),
        }
    }
}

/// Post entity - a blog post owned by its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub slug: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated input for a new post, as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    /// Explicit slug; derived from the title when absent.
    pub slug: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    /// An empty excerpt clears the stored one.
    pub excerpt: Option<String>,
    pub status: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.excerpt.is_none()
            && self.status.is_none()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Post {
    /// Build a published post from client input.
    ///
    /// Trims title and content, parses the category and derives the slug. The
    /// returned post has passed [`Post::validate`].
    pub fn create(author_id: Uuid, input: NewPost) -> Result<Self, DomainError> {
        let (Some(title), Some(content), Some(category)) = (
            present(input.title),
            present(input.content),
            present(input.category),
        ) else {
            return Err(DomainError::validation(
                "Title, content, and category are required",
            ));
        };

        let category = category.parse::<Category>()?;
        let slug = match present(input.slug) {
            Some(explicit) => slugify(&explicit),
            None => slugify(&title),
        };

        let now = Utc::now();
        let post = Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            category,
            slug,
            excerpt: present(input.excerpt),
            status: PostStatus::Published,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        post.validate()?;
        Ok(post)
    }

    /// Apply a partial update and re-validate the result.
    ///
    /// On error `self` is left unchanged. Slug and author never change.
    pub fn apply(&mut self, changes: PostChanges) -> Result<(), DomainError> {
        let mut next = self.clone();

        if let Some(title) = changes.title {
            next.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            next.content = content.trim().to_string();
        }
        if let Some(category) = changes.category {
            next.category = category.trim().parse()?;
        }
        if let Some(excerpt) = changes.excerpt {
            next.excerpt = present(Some(excerpt));
        }
        if let Some(status) = changes.status {
            next.status = status.trim().parse()?;
        }

        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }

    /// Check the document-level invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "Title cannot exceed {} characters",
                TITLE_MAX_CHARS
            )));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.chars().count() > EXCERPT_MAX_CHARS {
                return Err(DomainError::validation(format!(
                    "Excerpt cannot exceed {} characters",
                    EXCERPT_MAX_CHARS
                )));
            }
        }
        if self.slug.is_empty() {
            return Err(DomainError::validation(
                "Title must contain at least one letter or digit",
            ));
        }
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Public projection of a post's author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// A post with its author expanded. `author` is `None` when the account no
/// longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}

/// Listing filter with 1-indexed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<Category>,
    pub page: u64,
    pub page_size: u64,
}

impl PostFilter {
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_PAGE_SIZE: u64 = 100;

    /// Normalize raw paging input: pages start at 1 and the page size is
    /// clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(category: Option<Category>, page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            category,
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip. Saturates at `i64::MAX` so an out-of-range page yields an
    /// empty listing on every backend.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

impl Default for PostFilter {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str, category: &str) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_derives_slug_and_defaults() {
        let author = Uuid::new_v4();
        let post = Post::create(author, input("My First Post!", "Hello", "tech")).unwrap();

        assert_eq!(post.slug, "my-first-post");
        assert_eq!(post.category, Category::Tech);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.views, 0);
        assert_eq!(post.author_id, author);
    }

    #[test]
    fn test_create_trims_fields() {
        let post = Post::create(Uuid::new_v4(), input("  Spaced  ", "  body ", "travel")).unwrap();
        assert_eq!(post.title, "Spaced");
        assert_eq!(post.content, "body");
    }

    #[test]
    fn test_create_requires_fields() {
        let err = Post::create(Uuid::new_v4(), input("   ", "body", "tech")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Post::create(
            Uuid::new_v4(),
            NewPost {
                title: Some("Title".into()),
                content: Some("body".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let err = Post::create(Uuid::new_v4(), input("Title", "body", "cooking")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("cooking")));
    }

    #[test]
    fn test_create_rejects_long_title() {
        let title = "a".repeat(TITLE_MAX_CHARS + 1);
        let err = Post::create(Uuid::new_v4(), input(&title, "body", "tech")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let title = "a".repeat(TITLE_MAX_CHARS);
        assert!(Post::create(Uuid::new_v4(), input(&title, "body", "tech")).is_ok());
    }

    #[test]
    fn test_create_rejects_symbol_only_title() {
        let err = Post::create(Uuid::new_v4(), input("?!?", "body", "tech")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("letter or digit")));
    }

    #[test]
    fn test_create_normalizes_explicit_slug() {
        let mut new_post = input("Some title", "body", "other");
        new_post.slug = Some("Custom Slug".into());
        let post = Post::create(Uuid::new_v4(), new_post).unwrap();
        assert_eq!(post.slug, "custom-slug");
    }

    #[test]
    fn test_apply_keeps_slug_and_absent_fields() {
        let mut post = Post::create(Uuid::new_v4(), input("Original", "body", "tech")).unwrap();
        post.apply(PostChanges {
            title: Some("Renamed".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(post.title, "Renamed");
        assert_eq!(post.slug, "original");
        assert_eq!(post.content, "body");
        assert_eq!(post.category, Category::Tech);
    }

    #[test]
    fn test_apply_rejects_empty_title_without_mutating() {
        let mut post = Post::create(Uuid::new_v4(), input("Original", "body", "tech")).unwrap();
        let before = post.clone();

        let err = post
            .apply(PostChanges {
                title: Some("  ".into()),
                content: Some("new body".into()),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(post, before);
    }

    #[test]
    fn test_apply_status_and_excerpt() {
        let mut post = Post::create(Uuid::new_v4(), input("Original", "body", "tech")).unwrap();
        post.apply(PostChanges {
            status: Some("draft".into()),
            excerpt: Some("short".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.excerpt.as_deref(), Some("short"));

        post.apply(PostChanges {
            excerpt: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(post.excerpt, None);
    }

    #[test]
    fn test_filter_normalization() {
        let filter = PostFilter::new(None, Some(0), Some(0));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, 1);

        let filter = PostFilter::new(Some(Category::Tech), Some(3), None);
        assert_eq!(filter.page_size, PostFilter::DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset(), 20);

        let filter = PostFilter::new(None, None, Some(10_000));
        assert_eq!(filter.page_size, PostFilter::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        let filter = PostFilter::new(None, Some(u64::MAX), Some(50));
        assert_eq!(filter.offset(), i64::MAX as u64);

        let filter = PostFilter::new(None, Some(u64::MAX / 2), Some(2));
        assert_eq!(filter.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("Tech".parse::<Category>().is_err());
    }
}
