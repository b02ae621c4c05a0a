//! Post lifecycle: listing, lookup, and author-scoped mutation.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, NewPost, Post, PostChanges, PostFilter, PostView};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository, UserRepository};

const ENTITY: &str = "Post";

/// Validates and mutates posts, restricting writes to the post's author.
///
/// The service does no locking of its own; conflicting writes are serialized
/// by the repository (unique slug index, per-row atomicity).
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    default_page_size: u64,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            posts,
            users,
            default_page_size: PostFilter::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, page_size: u64) -> Self {
        self.default_page_size = page_size.clamp(1, PostFilter::MAX_PAGE_SIZE);
        self
    }

    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// One page of published posts, newest first. Empty pages are not errors.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_published(filter).await?;
        self.expand_all(posts).await
    }

    /// Any post by id, whatever its status.
    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self.load(id).await?;
        self.expand(post).await
    }

    pub async fn create(&self, author_id: Uuid, input: NewPost) -> Result<PostView, DomainError> {
        let post = Post::create(author_id, input)?;

        if self.posts.find_by_slug(&post.slug).await?.is_some() {
            return Err(slug_taken(&post.slug));
        }

        let slug = post.slug.clone();
        let saved = self.posts.insert(post).await.map_err(|e| match e {
            RepoError::Constraint(_) => slug_taken(&slug),
            other => other.into(),
        })?;

        tracing::info!(post_id = %saved.id, author_id = %author_id, slug = %saved.slug, "Post created");
        self.expand(saved).await
    }

    /// Apply a partial update. Ownership is checked before the payload, so a
    /// non-author always gets `Forbidden`.
    pub async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<PostView, DomainError> {
        let mut post = self.load_owned(id, author_id).await?;
        post.apply(changes)?;

        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, author_id = %author_id, "Post updated");
        self.expand(saved).await
    }

    pub async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        self.load_owned(id, author_id).await?;

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, author_id = %author_id, "Post deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn load_owned(&self, id: Uuid, author_id: Uuid) -> Result<Post, DomainError> {
        let post = self.load(id).await?;
        if !post.is_owned_by(author_id) {
            tracing::warn!(post_id = %id, user_id = %author_id, "Rejected change by non-author");
            return Err(DomainError::Forbidden(
                "Only the author can modify this post".into(),
            ));
        }
        Ok(post)
    }

    async fn expand(&self, post: Post) -> Result<PostView, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .as_ref()
            .map(AuthorSummary::from);

        Ok(PostView { post, author })
    }

    async fn expand_all(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, AuthorSummary::from(u)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                PostView { post, author }
            })
            .collect())
    }
}

fn slug_taken(slug: &str) -> DomainError {
    DomainError::Duplicate(format!("A post with slug '{}' already exists", slug))
}
