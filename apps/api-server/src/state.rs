//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostRepository;
use blog_infra::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use anyhow::Context;
#[cfg(feature = "postgres")]
use blog_infra::{DbPool, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<DbPool>,
}

impl AppState {
    /// Build the state from configuration. A configured but unreachable
    /// database is a startup error.
    pub async fn init(db_config: Option<&DatabaseConfig>) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => {
                let pool = DbPool::init(config)
                    .await
                    .context("failed to connect to database")?;
                let repo = Arc::new(PostgresPostRepository::new(pool.conn().clone()));
                Self {
                    posts: repo,
                    db: Some(pool),
                }
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
            Self::in_memory()
        };

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// State backed by an empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()))
    }

    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Storage status reported by the health endpoint.
    pub async fn database_status(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if let Some(pool) = &self.db {
            return match pool.ping().await {
                Ok(()) => "connected",
                Err(e) => {
                    tracing::warn!(error = %e, "Database ping failed");
                    "unreachable"
                }
            };
        }

        "in-memory"
    }

    /// Release the database pool, if any.
    pub async fn shutdown(self) {
        #[cfg(feature = "postgres")]
        if let Some(pool) = self.db {
            if let Err(e) = pool.close().await {
                tracing::warn!(error = %e, "Failed to close database pool cleanly");
            }
        }

        tracing::info!("Application state released");
    }
}
