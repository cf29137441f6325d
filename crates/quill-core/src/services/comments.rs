//! Comment reads, creation and deletion.
//!
//! A comment's id lives in exactly its parent post's comment sequence while the comment
//! exists: creation appends after the record is stored, deletion detaches before the record
//! is removed.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, Comment, CommentView, Post, Principal};
use crate::error::{DomainError, RepoError};
use crate::policy::authorize_owner_or_admin;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

use super::{AuthorResolver, comment_views};

pub struct CommentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    /// Comments of a post in sequence order.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let post = self.find_post(post_id).await?;
        let mut authors = AuthorResolver::new(self.users.as_ref());
        Ok(comment_views(self.comments.as_ref(), &mut authors, &post).await?)
    }

    /// Add a comment by `actor` to the end of a post's comment sequence.
    pub async fn add(
        &self,
        actor: &Principal,
        post_id: Uuid,
        content: Option<String>,
    ) -> Result<CommentView, DomainError> {
        let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
            return Err(DomainError::Validation(
                "Comment cannot be empty".to_string(),
            ));
        };

        let post = self.find_post(post_id).await?;

        let comment = self
            .comments
            .insert(Comment::new(post.id, actor.id, content))
            .await?;
        if let Err(e) = self.posts.attach_comment(post.id, comment.id).await {
            // The post vanished after the lookup; drop the unreachable record.
            self.comments.delete(comment.id).await?;
            return Err(match e {
                RepoError::NotFound => DomainError::not_found("Post", post_id),
                other => other.into(),
            });
        }

        tracing::info!(comment_id = %comment.id, post_id = %post_id, author_id = %actor.id, "Comment added");

        let author = AuthorSummary {
            id: actor.id,
            username: actor.username.clone(),
        };
        Ok(CommentView::new(comment, Some(author)))
    }

    /// Delete a comment if `actor` wrote it or is an admin.
    pub async fn delete(
        &self,
        actor: &Principal,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        let post = self.find_post(post_id).await?;

        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post.id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        authorize_owner_or_admin(actor, &comment)?;

        if !self.posts.detach_comment(post.id, comment.id).await? {
            tracing::warn!(comment_id = %comment.id, post_id = %post_id, "Comment missing from its post's sequence");
        }
        self.comments.delete(comment.id).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, deleted_by = %actor.id, "Comment deleted");
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }
}
