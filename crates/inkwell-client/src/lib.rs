//! # Inkwell Client
//!
//! Client side of the blog: typed API bindings, bearer-token persistence, the
//! session state machine, memoized post queries, and form state with the
//! same validation rules the server enforces.

pub mod api;
pub mod cache;
pub mod error;
pub mod forms;
pub mod posts;
pub mod session;
pub mod storage;

pub use api::{AuthApi, HttpApi, PostsApi};
pub use error::{ClientError, ErrorKind};
pub use posts::{DeleteOutcome, PostsClient};
pub use session::{SessionManager, SessionState};
pub use storage::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
