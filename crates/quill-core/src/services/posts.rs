//! Post reads, creation and deletion.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, Post, PostView, Principal};
use crate::error::DomainError;
use crate::policy::authorize_owner_or_admin;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

use super::{AuthorResolver, comment_views, required};

/// New post input as submitted.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PostService {
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

    /// Every post, oldest first.
    pub async fn list(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_all().await?;
        self.views(posts).await
    }

    /// Posts by one author, oldest first. An unknown author simply has no posts.
    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_by_author(author_id).await?;
        self.views(posts).await
    }

    pub async fn get(&self, post_id: Uuid) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let mut views = self.views(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("post view vanished".to_string()))
    }

    /// Create a post authored by `actor`.
    pub async fn create(
        &self,
        actor: &Principal,
        draft: PostDraft,
    ) -> Result<PostView, DomainError> {
        let (Some(title), Some(content)) = (required(draft.title), required(draft.content)) else {
            return Err(DomainError::Validation(
                "Title and content are required".to_string(),
            ));
        };

        let post = self
            .posts
            .insert(Post::new(actor.id, title, content))
            .await?;
        tracing::info!(post_id = %post.id, author_id = %actor.id, "Post created");

        let author = AuthorSummary {
            id: actor.id,
            username: actor.username.clone(),
        };
        Ok(PostView::new(post, Some(author), Vec::new()))
    }

    /// Delete a post if `actor` wrote it or is an admin.
    ///
    /// Comments are left in place; their records keep pointing at the deleted post.
    pub async fn delete(&self, actor: &Principal, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        authorize_owner_or_admin(actor, &post)?;

        self.posts.delete(post.id).await?;
        tracing::info!(
            post_id = %post.id,
            deleted_by = %actor.id,
            orphaned_comments = post.comment_ids.len(),
            "Post deleted"
        );
        Ok(())
    }

    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut authors = AuthorResolver::new(self.users.as_ref());
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let author = authors.resolve(post.author_id).await?;
            let comments = comment_views(self.comments.as_ref(), &mut authors, &post).await?;
            views.push(PostView::new(post, author, comments));
        }
        Ok(views)
    }
}
