//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod users;

use actix_web::{error::JsonPayloadError, web};
use uuid::Uuid;

use quill_core::domain::{AuthorSummary, CommentView, PostView};
use quill_shared::dto::{AuthorResponse, CommentResponse, PostResponse};

use crate::middleware::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/users")
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login)),
        )
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                .route("", web::post().to(posts::create_post))
                .route("/user/{user_id}", web::get().to(posts::list_posts_by_author))
                .route("/{post_id}", web::get().to(posts::get_post))
                .route("/{post_id}", web::delete().to(posts::delete_post))
                .route(
                    "/{post_id}/comments/{comment_id}",
                    web::delete().to(comments::delete_comment),
                ),
        )
        .service(
            web::scope("/comments")
                .route("/{post_id}", web::get().to(comments::list_comments))
                .route("/{post_id}", web::post().to(comments::add_comment))
                .route(
                    "/{post_id}/{comment_id}",
                    web::delete().to(comments::delete_comment),
                ),
        );
}

/// Undecodable JSON bodies become a 400 problem response.
fn json_error(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError::BadRequest("Invalid request body".to_string()).into()
}

/// Parse a path segment as an id of the named kind.
fn parse_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {kind} id")))
}

fn author_response(author: Option<AuthorSummary>) -> Option<AuthorResponse> {
    author.map(|a| AuthorResponse {
        id: a.id,
        username: a.username,
    })
}

fn comment_response(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.id,
        content: view.content,
        author: author_response(view.author),
        post: view.post_id,
        created_at: view.created_at,
    }
}

fn post_response(view: PostView) -> PostResponse {
    PostResponse {
        id: view.id,
        title: view.title,
        content: view.content,
        author: author_response(view.author),
        comments: view.comments.into_iter().map(comment_response).collect(),
        created_at: view.created_at,
        updated_at: view.updated_at,
    }
}
