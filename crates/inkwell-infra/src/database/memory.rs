//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Uniqueness rules mirror the Postgres schema: unique user email and
//! username, unique post slug. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Post, PostFilter, PostStatus, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository, UserRepository};

/// In-memory user store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn clash(users: &HashMap<Uuid, User>, candidate: &User) -> Option<RepoError> {
        users
            .values()
            .filter(|u| u.id != candidate.id)
            .find_map(|u| {
                if u.email == candidate.email {
                    Some(RepoError::Constraint("users.email".into()))
                } else if u.username == candidate.username {
                    Some(RepoError::Constraint("users.username".into()))
                } else {
                    None
                }
            })
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users.id".into()));
        }
        if let Some(err) = Self::clash(&users, &user) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(err) = Self::clash(&users, &user) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

/// In-memory post store keyed by id.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn slug_taken(posts: &HashMap<Uuid, Post>, candidate: &Post) -> bool {
        posts
            .values()
            .any(|p| p.id != candidate.id && p.slug == candidate.slug)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts.id".into()));
        }
        if Self::slug_taken(&posts, &post) {
            return Err(RepoError::Constraint("posts.slug".into()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if Self::slug_taken(&posts, &post) {
            return Err(RepoError::Constraint("posts.slug".into()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list_published(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;

        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .filter(|p| filter.category.is_none_or(|c| p.category == c))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.page_size).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use inkwell_core::domain::{Category, NewPost};

    use super::*;

    fn post(title: &str, category: &str) -> Post {
        Post::create(
            Uuid::new_v4(),
            NewPost {
                title: Some(title.into()),
                content: Some("body".into()),
                category: Some(category.into()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("Hello World!", "tech")).await.unwrap();

        let err = repo.insert(post("hello, world", "tech")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let saved = repo.insert(post("Once", "tech")).await.unwrap();

        repo.delete(saved.id).await.unwrap();
        assert!(matches!(
            repo.delete(saved.id).await.unwrap_err(),
            RepoError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_list_published_orders_filters_and_pages() {
        let repo = InMemoryPostRepository::new();
        let now = Utc::now();

        for (i, category) in ["tech", "travel", "tech", "tech"].iter().enumerate() {
            let mut p = post(&format!("Post {}", i), category);
            p.created_at = now + Duration::seconds(i as i64);
            repo.insert(p).await.unwrap();
        }
        let mut draft = post("Hidden draft", "tech");
        draft.status = PostStatus::Draft;
        repo.insert(draft).await.unwrap();

        let all = repo.list_published(&PostFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].title, "Post 3");
        assert_eq!(all[3].title, "Post 0");

        let tech = repo
            .list_published(&PostFilter::new(Some(Category::Tech), None, None))
            .await
            .unwrap();
        assert_eq!(tech.len(), 3);
        assert!(tech.iter().all(|p| p.category == Category::Tech));

        let second_page = repo
            .list_published(&PostFilter::new(Some(Category::Tech), Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].title, "Post 0");
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.insert(User::new("ada".into(), "ada@example.com".into(), "h".into()))
            .await
            .unwrap();

        let err = repo
            .insert(User::new("other".into(), "ada@example.com".into(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(msg) if msg == "users.email"));

        let err = repo
            .insert(User::new("ada".into(), "other@example.com".into(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(msg) if msg == "users.username"));
    }
}
