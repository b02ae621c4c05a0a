//! Collaborator contracts for the auth and post endpoints, and their HTTP
//! implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use inkwell_shared::dto::{
    AuthResponse, CreatePostRequest, ListPostsQuery, LoginRequest, PostResponse,
    RegisterUserRequest, UpdatePostRequest, UserResponse,
};
use inkwell_shared::{ErrorResponse, MessageResponse};

use crate::error::ClientError;

/// Credential store as seen from the client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError>;

    async fn register(&self, user: &RegisterUserRequest) -> Result<AuthResponse, ClientError>;

    /// Resolve a bearer token to its user.
    async fn current_user(&self, token: &str) -> Result<UserResponse, ClientError>;
}

/// Post endpoints. Mutations take the caller's bearer token.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self, query: &ListPostsQuery) -> Result<Vec<PostResponse>, ClientError>;

    async fn get_post(&self, id: Uuid) -> Result<PostResponse, ClientError>;

    async fn create_post(
        &self,
        token: &str,
        body: &CreatePostRequest,
    ) -> Result<PostResponse, ClientError>;

    async fn update_post(
        &self,
        token: &str,
        id: Uuid,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError>;

    async fn delete_post(&self, token: &str, id: Uuid) -> Result<MessageResponse, ClientError>;
}

/// reqwest-backed client for the `/api` surface.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl HttpApi {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let problem = response.json::<ErrorResponse>().await.ok();
        let err = ClientError::from_problem(status.as_u16(), problem);
        tracing::debug!(status = %status, error = %err, "Request rejected");
        Err(err)
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    #[tracing::instrument(skip_all)]
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip_all)]
    async fn register(&self, user: &RegisterUserRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(user)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip_all)]
    async fn current_user(&self, token: &str) -> Result<UserResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl PostsApi for HttpApi {
    #[tracing::instrument(skip(self))]
    async fn list_posts(&self, query: &ListPostsQuery) -> Result<Vec<PostResponse>, ClientError> {
        let response = self
            .client
            .get(self.url("/posts"))
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_post(&self, id: Uuid) -> Result<PostResponse, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/posts/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, token, body))]
    async fn create_post(
        &self,
        token: &str,
        body: &CreatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/posts"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, token, body))]
    async fn update_post(
        &self,
        token: &str,
        id: Uuid,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/posts/{}", id)))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, token))]
    async fn delete_post(&self, token: &str, id: Uuid) -> Result<MessageResponse, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }
}
