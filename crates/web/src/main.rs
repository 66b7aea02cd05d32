use database::PgDatabase;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web::{
    auth::AuthKeys, config::AppConfig, media::MediaStore, start_web_server, WebState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()
        .expect("expected database connection info and JWT_SECRET in env.");

    let database = PgDatabase::connect(config.database)
        .await
        .expect("could not connect to database.");

    let state = WebState {
        db: database,
        auth: AuthKeys::new(config.jwt_secret.as_bytes(), config.token_ttl),
        media: MediaStore::new(config.media_root),
    };

    tracing::info!("listening on {}", config.bind_addr);
    start_web_server(state, config.bind_addr)
        .await
        .expect("web server failed.");
}
