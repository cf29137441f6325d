use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post and the ordered ids of its comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with no comments.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            comment_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a comment reference to the end of the sequence.
    pub fn attach_comment(&mut self, comment_id: Uuid) {
        self.comment_ids.push(comment_id);
        self.updated_at = Utc::now();
    }

    /// Remove a comment reference. Returns whether it was present.
    pub fn detach_comment(&mut self, comment_id: Uuid) -> bool {
        let before = self.comment_ids.len();
        self.comment_ids.retain(|id| *id != comment_id);
        let removed = self.comment_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}
