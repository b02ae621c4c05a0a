//! Post lifecycle workflow against the in-memory repositories.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::{Category, NewPost, PostChanges, PostFilter, PostStatus, User, slugify};
use inkwell_core::ports::{BaseRepository, PostRepository, UserRepository};
use inkwell_core::services::PostService;
use inkwell_infra::{InMemoryPostRepository, InMemoryUserRepository};

struct Fixture {
    service: PostService,
    posts: Arc<InMemoryPostRepository>,
    users: Arc<InMemoryUserRepository>,
}

impl Fixture {
    fn new() -> Self {
        let posts = Arc::new(InMemoryPostRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = PostService::new(posts.clone(), users.clone());
        Self {
            service,
            posts,
            users,
        }
    }

    async fn user(&self, name: &str) -> User {
        self.users
            .insert(User::new(
                name.to_string(),
                format!("{}@example.com", name),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }
}

fn new_post(title: &str, content: &str, category: &str) -> NewPost {
    NewPost {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        category: Some(category.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_then_get_returns_slugified_post() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;

    let created = fx
        .service
        .create(author.id, new_post("My First Post!", "Hello", "tech"))
        .await
        .unwrap();

    let fetched = fx.service.get(created.post.id).await.unwrap();
    assert_eq!(fetched.post.slug, slugify("My First Post!"));
    assert_eq!(fetched.post.slug, "my-first-post");
    assert_eq!(fetched.post.category, Category::Tech);
    assert_eq!(fetched.post.status, PostStatus::Published);
    assert_eq!(fetched.post.views, 0);
    assert_eq!(fetched.post.author_id, author.id);

    let expanded = fetched.author.expect("author should be expanded");
    assert_eq!(expanded.id, author.id);
    assert_eq!(expanded.username, "ada");
    assert_eq!(expanded.email, "ada@example.com");
}

#[tokio::test]
async fn test_second_post_with_same_slug_fails() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;

    fx.service
        .create(author.id, new_post("Hello World!", "one", "tech"))
        .await
        .unwrap();
    let err = fx
        .service
        .create(author.id, new_post("hello, world", "two", "lifestyle"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Duplicate(msg) if msg.contains("hello-world")));
}

#[tokio::test]
async fn test_create_validation_errors() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;

    for input in [
        new_post("", "content", "tech"),
        new_post("Title", "   ", "tech"),
        new_post("Title", "content", ""),
        new_post("Title", "content", "gardening"),
        new_post("!!!", "content", "tech"),
    ] {
        let err = fx.service.create(author.id, input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "got {:?}", err);
    }
}

#[tokio::test]
async fn test_update_by_non_author_is_forbidden_regardless_of_payload() {
    let fx = Fixture::new();
    let owner = fx.user("ada").await;
    let intruder = fx.user("mallory").await;

    let created = fx
        .service
        .create(owner.id, new_post("Owned", "body", "tech"))
        .await
        .unwrap();

    let payloads = [
        PostChanges {
            title: Some("Valid title".into()),
            ..Default::default()
        },
        PostChanges {
            title: Some(String::new()),
            category: Some("not-a-category".into()),
            ..Default::default()
        },
        PostChanges::default(),
    ];

    for changes in payloads {
        let err = fx
            .service
            .update(created.post.id, intruder.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)), "got {:?}", err);
    }

    let unchanged = fx.service.get(created.post.id).await.unwrap();
    assert_eq!(unchanged.post.title, "Owned");
}

#[tokio::test]
async fn test_update_applies_only_supplied_fields() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;
    let created = fx
        .service
        .create(author.id, new_post("Before", "old body", "tech"))
        .await
        .unwrap();

    let updated = fx
        .service
        .update(
            created.post.id,
            author.id,
            PostChanges {
                title: Some("After".into()),
                category: Some("travel".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.post.title, "After");
    assert_eq!(updated.post.category, Category::Travel);
    assert_eq!(updated.post.content, "old body");
    assert_eq!(updated.post.slug, "before");
    assert!(updated.post.updated_at >= created.post.updated_at);
}

#[tokio::test]
async fn test_update_by_author_with_invalid_field_is_validation_error() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;
    let created = fx
        .service
        .create(author.id, new_post("Valid", "body", "tech"))
        .await
        .unwrap();

    let err = fx
        .service
        .update(
            created.post.id,
            author.id,
            PostChanges {
                category: Some("space".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;

    let err = fx
        .service
        .update(Uuid::new_v4(), author.id, PostChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_lifecycle_example() {
    let fx = Fixture::new();
    let u = fx.user("u").await;
    let v = fx.user("v").await;

    let created = fx
        .service
        .create(u.id, new_post("My First Post!", "Hello", "tech"))
        .await
        .unwrap();
    assert_eq!(created.post.slug, "my-first-post");

    let err = fx.service.delete(created.post.id, v.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    fx.service.delete(created.post.id, u.id).await.unwrap();

    let err = fx.service.get(created.post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = fx.service.delete(created.post.id, u.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_empty_is_ok() {
    let fx = Fixture::new();
    let posts = fx.service.list(&PostFilter::default()).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_list_filters_published_by_category_newest_first() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;

    let older = fx
        .service
        .create(author.id, new_post("Older tech", "x", "tech"))
        .await
        .unwrap();
    fx.service
        .create(author.id, new_post("Travel notes", "x", "travel"))
        .await
        .unwrap();
    let newer = fx
        .service
        .create(author.id, new_post("Newer tech", "x", "tech"))
        .await
        .unwrap();
    let drafted = fx
        .service
        .create(author.id, new_post("Draft tech", "x", "tech"))
        .await
        .unwrap();
    fx.service
        .update(
            drafted.post.id,
            author.id,
            PostChanges {
                status: Some("draft".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Creation timestamps can tie within one clock tick; pin them apart.
    let mut pinned = newer.post.clone();
    pinned.created_at = Utc::now() + Duration::seconds(5);
    fx.posts.update(pinned).await.unwrap();

    let tech = fx
        .service
        .list(&PostFilter::new(Some(Category::Tech), None, None))
        .await
        .unwrap();

    let titles: Vec<&str> = tech.iter().map(|v| v.post.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer tech", "Older tech"]);
    assert!(tech.iter().all(|v| v.post.category == Category::Tech));
    assert!(tech.iter().all(|v| v.author.is_some()));
    assert_ne!(older.post.id, newer.post.id);

    // Drafts are still reachable by id.
    let draft = fx.service.get(drafted.post.id).await.unwrap();
    assert_eq!(draft.post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_list_paginates() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;
    for i in 0..5 {
        fx.service
            .create(author.id, new_post(&format!("Post {}", i), "x", "other"))
            .await
            .unwrap();
    }

    let page1 = fx
        .service
        .list(&PostFilter::new(None, Some(1), Some(2)))
        .await
        .unwrap();
    let page3 = fx
        .service
        .list(&PostFilter::new(None, Some(3), Some(2)))
        .await
        .unwrap();
    let page4 = fx
        .service
        .list(&PostFilter::new(None, Some(4), Some(2)))
        .await
        .unwrap();

    assert_eq!(page1.len(), 2);
    assert_eq!(page3.len(), 1);
    assert!(page4.is_empty());
}

#[tokio::test]
async fn test_post_of_deleted_author_has_no_expansion() {
    let fx = Fixture::new();
    let author = fx.user("ada").await;
    let created = fx
        .service
        .create(author.id, new_post("Orphan", "x", "tech"))
        .await
        .unwrap();

    fx.users.delete(author.id).await.unwrap();

    let fetched = fx.service.get(created.post.id).await.unwrap();
    assert!(fetched.author.is_none());
    assert!(fx.posts.find_by_slug("orphan").await.unwrap().is_some());
}
