//! Domain entities - the core business objects.

mod post;
mod slug;
mod user;

pub use post::{AuthorSummary, Category, NewPost, Post, PostChanges, PostFilter, PostStatus, PostView};
pub use slug::slugify;
pub use user::User;
