//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_shared::MessageResponse;
use quill_shared::dto::{CommentResponse, CreateCommentRequest};

use super::{comment_response, parse_id};
use crate::middleware::{AppResult, Identity};
use crate::state::AppState;

/// GET /comments/{post_id}
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "post")?;

    let comments: Vec<CommentResponse> = state
        .comments
        .list_for_post(post_id)
        .await?
        .into_iter()
        .map(comment_response)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /comments/{post_id}
pub async fn add_comment(
    state: web::Data<AppState>,
    Identity(actor): Identity,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "post")?;

    let comment = state
        .comments
        .add(&actor, post_id, body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// DELETE /comments/{post_id}/{comment_id}
/// DELETE /posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    Identity(actor): Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_id(&post_id, "post")?;
    let comment_id = parse_id(&comment_id, "comment")?;

    state.comments.delete(&actor, post_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}
