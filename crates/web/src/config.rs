use std::{env, net::SocketAddr, path::PathBuf};

use chrono::Duration;
use database::DatabaseConnectionInfo;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Process configuration, read from the environment. `DATABASE_*` and
/// `JWT_SECRET` are required; everything else has a sensible default.
pub struct AppConfig {
    pub database: DatabaseConnectionInfo,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub media_root: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Option<Self> {
        let database = DatabaseConnectionInfo::from_env()?;
        let jwt_secret = env::var("JWT_SECRET").ok()?;
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|addr| addr.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));
        let token_ttl = env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|minutes| minutes.parse().ok())
            .map(Duration::minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));
        let media_root = env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));

        Some(Self {
            database,
            bind_addr,
            jwt_secret,
            token_ttl,
            media_root,
        })
    }
}
