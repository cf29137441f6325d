//! Read models with author references resolved for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Post, User};

/// Public fields of a post or comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    /// `None` when the author record no longer resolves.
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: Option<AuthorSummary>) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content,
            author,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Option<AuthorSummary>,
    /// Comments in the order of the post's comment sequence.
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, author: Option<AuthorSummary>, comments: Vec<CommentView>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
