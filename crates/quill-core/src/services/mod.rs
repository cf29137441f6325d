//! Application services - the operations the HTTP layer exposes.
//!
//! Each call is a short, independent sequence of store lookups and writes. Nothing is
//! coordinated across concurrent calls beyond the single-record atomicity of the stores.

mod auth;
mod comments;
mod posts;

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{AuthorSummary, CommentView, Post};
use crate::error::RepoError;
use crate::ports::{CommentRepository, UserRepository};

pub use auth::{AuthService, Credentials, Registration, Session};
pub use comments::CommentService;
pub use posts::{PostDraft, PostService};

/// Treat an absent or empty field as missing.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Memoizing author lookup used while building read views.
struct AuthorResolver<'a> {
    users: &'a dyn UserRepository,
    seen: HashMap<Uuid, Option<AuthorSummary>>,
}

impl<'a> AuthorResolver<'a> {
    fn new(users: &'a dyn UserRepository) -> Self {
        Self {
            users,
            seen: HashMap::new(),
        }
    }

    async fn resolve(&mut self, user_id: Uuid) -> Result<Option<AuthorSummary>, RepoError> {
        if let Some(summary) = self.seen.get(&user_id) {
            return Ok(summary.clone());
        }

        let summary = self
            .users
            .find_by_id(user_id)
            .await?
            .as_ref()
            .map(AuthorSummary::from);
        self.seen.insert(user_id, summary.clone());
        Ok(summary)
    }
}

/// Load a post's comments in sequence order with their authors resolved.
async fn comment_views(
    comments: &dyn CommentRepository,
    authors: &mut AuthorResolver<'_>,
    post: &Post,
) -> Result<Vec<CommentView>, RepoError> {
    if post.comment_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<Uuid, _> = comments
        .find_many(&post.comment_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut views = Vec::with_capacity(by_id.len());
    for id in &post.comment_ids {
        // A dangling reference is skipped rather than failing the whole read.
        if let Some(comment) = by_id.remove(id) {
            let author = authors.resolve(comment.author_id).await?;
            views.push(CommentView::new(comment, author));
        }
    }
    Ok(views)
}
