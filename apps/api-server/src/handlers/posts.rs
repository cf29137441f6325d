//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::PostDraft;
use quill_shared::MessageResponse;
use quill_shared::dto::{CreatePostRequest, PostResponse};

use super::{parse_id, post_response};
use crate::middleware::{AppResult, Identity};
use crate::state::AppState;

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list()
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/user/{user_id}
pub async fn list_posts_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author_id = parse_id(&path, "user")?;

    let posts: Vec<PostResponse> = state
        .posts
        .list_by_author(author_id)
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "post")?;
    let post = state.posts.get(post_id).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    Identity(actor): Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(
            &actor,
            PostDraft {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    Identity(actor): Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "post")?;
    state.posts.delete(&actor, post_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
