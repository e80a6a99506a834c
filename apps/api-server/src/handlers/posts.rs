//! Post CRUD handlers.
//!
//! Every handler validates its input before touching storage and performs an
//! explicit existence read before mutating a row.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use blog_core::DomainError;
use blog_core::domain::{Post, PostId};
use blog_core::ports::{BaseRepository, PostRepository};
use blog_core::validation::{check_create, check_id, check_update};
use blog_shared::{MessageResponse, PostResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_all()
        .await
        .map_err(|e| AppError::from_domain("Failed to fetch posts", e.into()))?;

    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = fetch_one(&state, &path)
        .await
        .map_err(|e| AppError::from_domain("Failed to fetch post", e))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let post = create_one(&state, &body)
        .await
        .map_err(|e| AppError::from_domain("Failed to create post", e))?;

    tracing::info!(post_id = %post.id, "Post created");
    Ok(HttpResponse::Created().json(to_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let post = update_one(&state, &path, &body)
        .await
        .map_err(|e| AppError::from_domain("Failed to update post", e))?;

    tracing::info!(post_id = %post.id, "Post updated");
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = delete_one(&state, &path)
        .await
        .map_err(|e| AppError::from_domain("Failed to delete post", e))?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}

async fn fetch_one(state: &AppState, raw_id: &str) -> Result<Post, DomainError> {
    let id = check_id(raw_id)?;
    find_existing(state, &id).await
}

async fn create_one(state: &AppState, body: &Value) -> Result<Post, DomainError> {
    let input = check_create(body)?;
    Ok(state.posts.insert(input).await?)
}

async fn update_one(state: &AppState, raw_id: &str, body: &Value) -> Result<Post, DomainError> {
    let id = check_id(raw_id)?;
    let changes = check_update(body)?;

    find_existing(state, &id).await?;
    Ok(state.posts.update_by_id(&id, changes).await?)
}

async fn delete_one(state: &AppState, raw_id: &str) -> Result<PostId, DomainError> {
    let id = check_id(raw_id)?;

    find_existing(state, &id).await?;
    state.posts.delete_by_id(&id).await?;
    Ok(id)
}

async fn find_existing(state: &AppState, id: &PostId) -> Result<Post, DomainError> {
    state
        .posts
        .get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound {
            entity_type: "Post",
            id: id.to_string(),
        })
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.into(),
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    use blog_core::domain::{NewPost, Post, PostId};
    use blog_core::error::RepoError;
    use blog_core::ports::{BaseRepository, PostRepository};
    use blog_infra::InMemoryPostRepository;
    use blog_shared::{ErrorResponse, MessageResponse, PostResponse};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    /// Repository whose every call fails, to prove a request never reached storage
    /// (400) or that storage faults are hidden (500).
    struct FailingRepository;

    fn down() -> RepoError {
        RepoError::Connection("connection refused (db.internal:5432)".to_string())
    }

    #[async_trait]
    impl BaseRepository<Post, PostId> for FailingRepository {
        async fn find_by_id(&self, _id: &PostId) -> Result<Option<Post>, RepoError> {
            Err(down())
        }

        async fn insert_entity(&self, _post: Post) -> Result<Post, RepoError> {
            Err(down())
        }

        async fn update_entity(&self, _post: Post) -> Result<Post, RepoError> {
            Err(down())
        }

        async fn delete_by_id(&self, _id: &PostId) -> Result<(), RepoError> {
            Err(down())
        }
    }

    #[async_trait]
    impl PostRepository for FailingRepository {
        async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
            Err(down())
        }
    }

    fn failing_state() -> AppState {
        AppState::with_repository(Arc::new(FailingRepository))
    }

    #[actix_web::test]
    async fn test_create_then_get() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hi", "content": "World" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: PostResponse = test::read_body_json(resp).await;

        assert_eq!(created.title, "Hi");
        assert_eq!(created.content, "World");
        assert!(!created.id.is_empty());
        assert!(created.id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(created.created_at, created.updated_at);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", created.id))
            .to_request();
        let fetched: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_create_rejects_out_of_bounds_input() {
        let app = init_app!(AppState::in_memory());

        let cases = [
            (json!({ "title": "", "content": "World" }), "Title must be between 1 and 255 characters"),
            (json!({ "title": "t".repeat(256), "content": "World" }), "Title must be between 1 and 255 characters"),
            (json!({ "title": "Hi", "content": "" }), "Content must be between 1 and 10,000 characters"),
            (json!({ "title": "Hi", "content": "c".repeat(10_001) }), "Content must be between 1 and 10,000 characters"),
            (json!({ "content": "World" }), "Title is required"),
        ];

        for (body, expected) in cases {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let err: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(err.message, expected);
        }

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(posts.is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"title\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = test::read_body_json(resp).await;
        assert!(!err.message.is_empty());
    }

    #[actix_web::test]
    async fn test_partial_update_keeps_content() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hi", "content": "World" }))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;

        actix_web::rt::time::sleep(Duration::from_millis(5)).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .set_json(json!({ "title": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: PostResponse = test::read_body_json(resp).await;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Hello");
        assert_eq!(updated.content, "World");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[actix_web::test]
    async fn test_update_rejects_invalid_body() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::put()
            .uri("/api/posts/abc123")
            .set_json(json!({ "content": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_rejects_null_title() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hi", "content": "World" }))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .set_json(json!({ "title": null }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(err.message, "Title must be a string");

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", created.id))
            .to_request();
        let fetched: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_unknown_id_is_not_found() {
        let app = init_app!(AppState::in_memory());
        let uri = "/api/posts/doesnotexist";

        let requests = [
            test::TestRequest::get().uri(uri).to_request(),
            test::TestRequest::put()
                .uri(uri)
                .set_json(json!({ "title": "Hi" }))
                .to_request(),
            test::TestRequest::delete().uri(uri).to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let err: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(err.message, "Post not found");
        }
    }

    #[actix_web::test]
    async fn test_malformed_id_never_reaches_storage() {
        let app = init_app!(failing_state());
        let uri = "/api/posts/abc-123";

        let requests = [
            test::TestRequest::get().uri(uri).to_request(),
            test::TestRequest::put()
                .uri(uri)
                .set_json(json!({ "title": "Hi" }))
                .to_request(),
            test::TestRequest::delete().uri(uri).to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let err: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(err.message, "Post ID must be alphanumeric");
        }
    }

    #[actix_web::test]
    async fn test_invalid_create_never_reaches_storage() {
        let app = init_app!(failing_state());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "", "content": "World" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_is_ordered_by_created_at() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let base = Utc::now();

        for (title, offset) in [("third", 30), ("first", 10), ("second", 20)] {
            let mut post = Post::new(NewPost {
                title: title.to_string(),
                content: "Content".to_string(),
            });
            post.created_at = base + chrono::Duration::seconds(offset);
            post.updated_at = post.created_at;
            repo.insert_entity(post).await.unwrap();
        }

        let app = init_app!(AppState::with_repository(repo));

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert!(posts.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[actix_web::test]
    async fn test_delete_is_not_idempotent_success() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hi", "content": "World" }))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/posts/{}", created.id);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: MessageResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Post deleted");

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_storage_faults_are_generic_500s() {
        let app = init_app!(failing_state());

        let cases = [
            (
                test::TestRequest::get().uri("/api/posts").to_request(),
                "Failed to fetch posts",
            ),
            (
                test::TestRequest::get().uri("/api/posts/abc123").to_request(),
                "Failed to fetch post",
            ),
            (
                test::TestRequest::post()
                    .uri("/api/posts")
                    .set_json(json!({ "title": "Hi", "content": "World" }))
                    .to_request(),
                "Failed to create post",
            ),
            (
                test::TestRequest::put()
                    .uri("/api/posts/abc123")
                    .set_json(json!({ "title": "Hi" }))
                    .to_request(),
                "Failed to update post",
            ),
            (
                test::TestRequest::delete().uri("/api/posts/abc123").to_request(),
                "Failed to delete post",
            ),
        ];

        for (req, expected) in cases {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let err: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(err.message, expected);
            assert!(!err.message.contains("5432"));
        }
    }
}
