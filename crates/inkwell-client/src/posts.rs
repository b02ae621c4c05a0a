//! Post queries and mutations on behalf of the current session.

use std::sync::Arc;

use uuid::Uuid;

use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest};

use crate::api::PostsApi;
use crate::cache::QueryCache;
use crate::error::{ClientError, ErrorKind};
use crate::session::SessionManager;

const CACHE_PREFIX: &str = "posts:";

/// Result of a delete request that needs the user's confirmation first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(MessageResponse),
    Cancelled,
}

/// Reads are memoized; every successful mutation invalidates all cached reads.
pub struct PostsClient {
    api: Arc<dyn PostsApi>,
    session: Arc<SessionManager>,
    cache: QueryCache,
}

impl PostsClient {
    pub fn new(api: Arc<dyn PostsApi>, session: Arc<SessionManager>) -> Self {
        Self::with_cache(api, session, QueryCache::new())
    }

    pub fn with_cache(
        api: Arc<dyn PostsApi>,
        session: Arc<SessionManager>,
        cache: QueryCache,
    ) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    pub async fn list(&self, query: &ListPostsQuery) -> Result<Vec<PostResponse>, ClientError> {
        let key = format!(
            "{}list:{}:{}:{}",
            CACHE_PREFIX,
            query.category.as_deref().unwrap_or(""),
            query.page.map(|p| p.to_string()).unwrap_or_default(),
            query.limit.map(|l| l.to_string()).unwrap_or_default(),
        );
        if let Some(posts) = self.cache.get_json(&key).await {
            return Ok(posts);
        }

        let posts = self.api.list_posts(query).await?;
        self.cache.set_json(&key, &posts).await;
        Ok(posts)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostResponse, ClientError> {
        let key = format!("{}item:{}", CACHE_PREFIX, id);
        if let Some(post) = self.cache.get_json(&key).await {
            return Ok(post);
        }

        let post = self.api.get_post(id).await?;
        self.cache.set_json(&key, &post).await;
        Ok(post)
    }

    pub async fn create(&self, body: &CreatePostRequest) -> Result<PostResponse, ClientError> {
        let token = self.require_token()?;
        let post = self.api.create_post(&token, body).await?;
        self.invalidate().await;
        Ok(post)
    }

    pub async fn update(
        &self,
        id: Uuid,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        let token = self.require_token()?;
        let post = self.api.update_post(&token, id, body).await?;
        self.invalidate().await;
        Ok(post)
    }

    /// `confirm` is asked before anything is sent; declining is not an error.
    pub async fn delete<F>(&self, id: Uuid, confirm: F) -> Result<DeleteOutcome, ClientError>
    where
        F: FnOnce() -> bool,
    {
        let token = self.require_token()?;
        if !confirm() {
            tracing::debug!(post_id = %id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let message = self.api.delete_post(&token, id).await?;
        self.invalidate().await;
        Ok(DeleteOutcome::Deleted(message))
    }

    /// Whether edit/delete controls should be offered for `post`. Advisory
    /// only: the server makes the real decision.
    pub fn can_modify(&self, post: &PostResponse) -> bool {
        self.session
            .current_user()
            .is_some_and(|user| user.id == post.author_id)
    }

    fn require_token(&self) -> Result<String, ClientError> {
        self.session.token().ok_or_else(|| {
            ClientError::with_message(ErrorKind::Unauthorized, "You must be logged in")
        })
    }

    async fn invalidate(&self) {
        self.cache.invalidate_prefix(CACHE_PREFIX).await;
    }
}
