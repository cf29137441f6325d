//! In-memory stores - used when no database is configured, and by tests.
//!
//! Records are kept in insertion order so listings come back oldest first, like the
//! `created_at` ordering of the PostgreSQL repositories. Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

/// A record the in-memory store knows how to key.
pub trait StoredRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// A secondary key that must be unique across records, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

impl StoredRecord for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl StoredRecord for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl StoredRecord for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Generic in-memory repository over an async `RwLock`.
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: StoredRecord> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn find_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let records = self.records.read().await;
        records.iter().filter(|r| predicate(*r)).cloned().collect()
    }

    /// Apply `change` to one record under the write lock.
    async fn modify<R>(&self, id: Uuid, change: impl FnOnce(&mut T) -> R) -> Result<R, RepoError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(RepoError::NotFound)?;
        Ok(change(record))
    }
}

impl<T: StoredRecord> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: StoredRecord> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id() == entity.id()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if let Some(key) = entity.unique_key() {
            if records.iter().any(|r| r.unique_key() == Some(key)) {
                return Err(RepoError::Constraint(format!("Duplicate key: {key}")));
            }
        }

        records.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;

        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut records = self.records.write().await;

        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(RepoError::NotFound)?;
        records.remove(position);

        Ok(())
    }
}

/// In-memory credential store.
pub type InMemoryUserRepository = InMemoryRepository<User>;

/// In-memory post store.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

/// In-memory comment store.
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.find_where(|u| u.email == email).await.into_iter().next())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.find_where(|p| p.author_id == author_id).await)
    }

    async fn attach_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        self.modify(post_id, |post| post.attach_comment(comment_id))
            .await
    }

    async fn detach_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, RepoError> {
        self.modify(post_id, |post| post.detach_comment(comment_id))
            .await
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        Ok(self.find_where(|c| ids.contains(&c.id)).await)
    }
}
