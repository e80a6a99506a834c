use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the posts database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sql_logging: bool,
}

/// Connection pool for the posts database.
///
/// Built once at startup, cloned into the repository, and closed on shutdown.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct DbPool {
    conn: DbConn,
}

#[cfg(feature = "postgres")]
impl DbPool {
    /// Open the pool from configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(config.sql_logging)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            "Database connected"
        );

        Ok(Self { conn })
    }

    /// Handle used by repositories.
    pub fn conn(&self) -> &DbConn {
        &self.conn
    }

    /// Round-trip to the server; used by the health endpoint.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }

    /// Close every pooled connection.
    pub async fn close(self) -> Result<(), DbErr> {
        tracing::info!("Closing database connection pool");
        self.conn.close().await
    }
}
