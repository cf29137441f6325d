//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// The three stores every service is built over.
struct Stores {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// A configured database that cannot be reached is an error; without `DATABASE_URL` the
    /// server runs on in-memory stores.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                let conn = DatabaseConnections::init(db_config).await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to database");
                    std::io::Error::other(format!("database connection failed: {e}"))
                })?;

                if config.migrate_on_start {
                    use migration::{Migrator, MigratorTrait};

                    Migrator::up(&conn.main, None).await.map_err(|e| {
                        tracing::error!(error = %e, "Failed to apply migrations");
                        std::io::Error::other(format!("migration failed: {e}"))
                    })?;
                    tracing::info!("Migrations applied");
                }

                let stores = Stores::postgres(&conn);
                let mut state = Self::build(stores, config.jwt.clone());
                state.db = Some(Arc::new(conn));
                tracing::info!("Application state initialized (postgres)");
                return Ok(state);
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
        }

        tracing::warn!("DATABASE_URL not set. Running on in-memory stores; data is lost on restart.");
        Ok(Self::in_memory(config.jwt.clone()))
    }

    /// State over fresh in-memory stores.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::build(Stores::in_memory(), jwt)
    }

    fn build(stores: Stores, jwt: JwtConfig) -> Self {
        let tokens = Arc::new(JwtTokenService::new(jwt));
        let passwords = Arc::new(Argon2PasswordService::new());

        Self {
            auth: Arc::new(AuthService::new(stores.users.clone(), passwords, tokens)),
            posts: Arc::new(PostService::new(
                stores.users.clone(),
                stores.posts.clone(),
                stores.comments.clone(),
            )),
            comments: Arc::new(CommentService::new(
                stores.users,
                stores.posts,
                stores.comments,
            )),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
