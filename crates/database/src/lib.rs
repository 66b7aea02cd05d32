use std::env;

pub mod data_model;
pub mod error;
pub mod queries;

pub use error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Connection settings, read from the environment the same way the
/// deployment manifests set them.
#[derive(Debug, Clone)]
pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            username: env::var("DATABASE_USER").ok()?,
            password: env::var("DATABASE_PASSWORD").ok()?,
            hostname: env::var("DATABASE_HOST").ok()?,
            port: env::var("DATABASE_PORT").ok()?.parse().ok()?,
            database: env::var("DATABASE_NAME").ok()?,
        })
    }

    fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

/// Shared handle to the Postgres pool. Cloning is cheap; all clones share
/// the same pool.
#[derive(Clone)]
pub struct PgDatabase {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    /// Connects and applies pending migrations.
    pub async fn connect(info: DatabaseConnectionInfo) -> Result<Self> {
        let pool = sqlx::postgres::PgPool::connect(&info.postgres_url())
            .await
            .map_err(error::convert_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|why| StoreError::Migration(Box::new(why)))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}
