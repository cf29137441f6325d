//! Domain entities - the core business objects.

mod comment;
mod post;
mod principal;
mod user;
mod view;

pub use comment::Comment;
pub use post::Post;
pub use principal::Principal;
pub use user::{User, mask_email};
pub use view::{AuthorSummary, CommentView, PostView};
