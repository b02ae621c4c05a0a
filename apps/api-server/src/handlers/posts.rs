//! Post handlers. Reads are public; create, update and delete need an
//! authenticated author.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::{Category, NewPost, PostChanges, PostFilter, PostView};
use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{
    CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_response(view: PostView) -> PostResponse {
    let PostView { post, author } = view;
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: author.map(|a| UserResponse {
            id: a.id,
            username: a.username,
            email: a.email,
        }),
        author_id: post.author_id,
        category: post.category.to_string(),
        slug: post.slug,
        excerpt: post.excerpt,
        status: post.status.to_string(),
        views: post.views,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// GET /api/posts?category=&page=&limit=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse::<Category>)
        .transpose()?;
    let page_size = query.limit.unwrap_or(state.posts.default_page_size());
    let filter = PostFilter::new(category, query.page, Some(page_size));

    let posts: Vec<PostResponse> = state
        .posts
        .list(&filter)
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPost {
        title: req.title,
        content: req.content,
        category: req.category,
        excerpt: req.excerpt,
        slug: req.slug,
    };

    let view = state.posts.create(identity.user_id, input).await?;
    Ok(HttpResponse::Created().json(post_response(view)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        category: req.category,
        excerpt: req.excerpt,
        status: req.status,
    };

    let view = state
        .posts
        .update(path.into_inner(), identity.user_id, changes)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use inkwell_core::services::{AuthSession, RegisterInput};
    use inkwell_infra::JwtConfig;
    use inkwell_shared::ErrorResponse;

    use super::*;
    use crate::handlers::auth::user_response;
    use crate::handlers::configure_routes;

    async fn register(state: &AppState, username: &str) -> AuthSession {
        state
            .accounts
            .register(RegisterInput {
                username: username.into(),
                email: format!("{}@example.com", username),
                password: "secret1".into(),
            })
            .await
            .unwrap()
    }

    fn bearer(session: &AuthSession) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", session.token))
    }

    fn new_post(title: &str, category: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: Some(title.into()),
            content: Some("Hello".into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn test_post_lifecycle_over_http() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let author = register(&state, "ada").await;
        let other = register(&state, "bob").await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(new_post("My First Post!", "tech"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: PostResponse = test::read_body_json(resp).await;
        assert_eq!(created.slug, "my-first-post");
        assert_eq!(created.status, "published");
        assert_eq!(created.views, 0);
        assert_eq!(created.author, Some(user_response(&author.user)));

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&other))
            .set_json(UpdatePostRequest::default())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&author))
            .set_json(UpdatePostRequest {
                content: Some("Edited".into()),
                ..Default::default()
            })
            .to_request();
        let updated: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.content, "Edited");
        assert_eq!(updated.title, "My First Post!");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&author))
            .to_request();
        let message: MessageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(message.message, "Post deleted successfully");

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_requires_token_and_valid_body() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(new_post("Hello", "tech"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let author = register(&state, "ada").await;
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(CreatePostRequest {
                title: Some("Hello".into()),
                ..Default::default()
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let problem: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(
            problem.detail.as_deref(),
            Some("Title, content, and category are required")
        );
    }

    #[actix_web::test]
    async fn test_duplicate_slug_conflicts() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let author = register(&state, "ada").await;

        for (title, expected) in [
            ("Hello World", StatusCode::CREATED),
            ("hello, world!", StatusCode::CONFLICT),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&author))
                .set_json(new_post(title, "tech"))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_list_filters_by_category() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let empty: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(empty.is_empty());

        let author = register(&state, "ada").await;
        for (title, category) in [("One", "tech"), ("Two", "travel"), ("Three", "tech")] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&author))
                .set_json(new_post(title, category))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/posts?category=tech")
            .to_request();
        let tech: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tech.len(), 2);
        assert!(tech.iter().all(|p| p.category == "tech"));

        let req = test::TestRequest::get()
            .uri("/api/posts?category=gardening")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::get()
            .uri("/api/posts?limit=1&page=2")
            .to_request();
        let page: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page.len(), 1);
    }

    #[actix_web::test]
    async fn test_huge_page_number_returns_empty_list() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let author = register(&state, "ada").await;
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(new_post("Only", "tech"))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?page={}&limit=100", u64::MAX))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page: Vec<PostResponse> = test::read_body_json(resp).await;
        assert!(page.is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_id_is_not_found() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/posts/not-a-uuid")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
