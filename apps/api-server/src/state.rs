//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use inkwell_core::services::{AccountService, PostService};
use inkwell_infra::database::DatabaseConnections;
use inkwell_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub accounts: Arc<AccountService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to in-memory repositories
    /// when no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, users, posts) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    let users: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(conn.main.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(conn.main.clone()));
                    (Some(conn), users, posts)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::memory_repositories()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::memory_repositories()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, users, posts) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::memory_repositories()
        };

        let state = Self::build(
            users,
            posts,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.default_page_size,
        )
        .with_db(db);

        tracing::info!("Application state initialized");
        state
    }

    /// In-memory state with a cheap password hash, for tests and local runs.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = match Argon2PasswordService::with_cost(1024, 1)
        {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::warn!("Falling back to default Argon2 cost: {}", e);
                Arc::new(Argon2PasswordService::new())
            }
        };

        let (_, users, posts) = Self::memory_repositories();
        Self::build(
            users,
            posts,
            passwords,
            Arc::new(JwtTokenService::new(jwt)),
            inkwell_core::domain::PostFilter::DEFAULT_PAGE_SIZE,
        )
    }

    pub fn build(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        default_page_size: u64,
    ) -> Self {
        Self {
            posts: Arc::new(
                PostService::new(posts, users.clone()).with_default_page_size(default_page_size),
            ),
            accounts: Arc::new(AccountService::new(users, passwords, tokens)),
            db: None,
        }
    }

    fn with_db(mut self, db: Option<Arc<DatabaseConnections>>) -> Self {
        self.db = db;
        self
    }

    #[allow(clippy::type_complexity)]
    fn memory_repositories() -> (
        Option<Arc<DatabaseConnections>>,
        Arc<dyn UserRepository>,
        Arc<dyn PostRepository>,
    ) {
        (
            None,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }
}
