//! Application services - the workflows that sit on top of the ports.

mod accounts;
mod posts;

pub use accounts::{AccountService, AuthSession, RegisterInput};
pub use posts::PostService;
