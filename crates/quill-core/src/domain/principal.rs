use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// The resolved identity behind an authenticated request.
///
/// Built from the stored user record, so it never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}
