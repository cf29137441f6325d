use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Fails with [`RepoError::Constraint`] on a uniqueness clash.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Credential store.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post half of the content store.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, oldest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts written by one user, oldest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Append a comment id to a post's sequence in a single atomic write.
    ///
    /// Fails with [`RepoError::NotFound`] if the post is gone.
    async fn attach_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    /// Remove a comment id from a post's sequence in a single atomic write.
    ///
    /// Returns whether the id was present.
    async fn detach_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, RepoError>;
}

/// Comment half of the content store.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Load the comments with the given ids. Missing ids are skipped; order is unspecified.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Comment>, RepoError>;
}
