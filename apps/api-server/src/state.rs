//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use blog_infra::auth::{Argon2PasswordService, JwtTokenService};
use blog_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state. Repositories are passed in explicitly rather
/// than reached through entity-level globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub token_service: Arc<dyn TokenService>,
    pub password_service: Arc<dyn PasswordService>,
    pub paginate_by: u64,
}

impl AppState {
    /// Build the application state: connect to the database and wire up the
    /// repositories and auth services.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let connections = DatabaseConnections::init(&config.database).await?;
        let db = Arc::new(connections.main);

        let users = Arc::new(PostgresUserRepository::new(db.clone()));
        let posts = Arc::new(PostgresPostRepository::new(db.clone()));
        let comments = Arc::new(PostgresCommentRepository::new(db.clone()));
        let categories = Arc::new(PostgresCategoryRepository::new(db.clone()));
        let locations = Arc::new(PostgresLocationRepository::new(db));

        tracing::info!("Application state initialized");

        Ok(Self {
            users,
            posts,
            comments,
            categories,
            locations,
            token_service: Arc::new(JwtTokenService::from_env()),
            password_service: Arc::new(Argon2PasswordService::new()),
            paginate_by: config.paginate_by,
        })
    }
}
