//! Owner-or-admin authorization.
//!
//! One rule gates every mutation of an authored resource: administrators may act on anything,
//! everyone else only on what they wrote. Callers must confirm the resource exists first, so a
//! missing resource surfaces as not-found rather than forbidden.

use uuid::Uuid;

use crate::domain::{Comment, Post, Principal};
use crate::error::DomainError;
use crate::ports::AuthError;

/// A resource with an immutable author.
pub trait Authored {
    /// Human-readable resource kind used in denial messages.
    const KIND: &'static str;

    fn author_id(&self) -> Uuid;
}

impl Authored for Post {
    const KIND: &'static str = "post";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for Comment {
    const KIND: &'static str = "comment";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Allow if the actor is an admin or wrote the resource.
pub fn authorize_owner_or_admin<R: Authored>(
    actor: &Principal,
    resource: &R,
) -> Result<(), DomainError> {
    if actor.is_admin || actor.id == resource.author_id() {
        return Ok(());
    }

    tracing::warn!(
        user_id = %actor.id,
        author_id = %resource.author_id(),
        kind = R::KIND,
        "Denied mutation of resource owned by another user"
    );
    Err(DomainError::Forbidden(format!(
        "Unauthorized to delete this {}",
        R::KIND
    )))
}

/// Allow only administrators.
pub fn require_admin(actor: &Principal) -> Result<(), DomainError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}
