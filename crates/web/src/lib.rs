use std::net::SocketAddr;

use axum::{extract::FromRef, routing::get_service, Router};
use database::PgDatabase;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::AuthKeys;
use crate::media::MediaStore;

pub mod api;
pub mod auth;
pub mod common;
pub mod config;
pub mod media;
pub mod middleware;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub db: PgDatabase,
    pub auth: AuthKeys,
    pub media: MediaStore,
}

pub async fn start_web_server(
    state: WebState,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let media_root = state.media.root().to_owned();
    let routes = Router::new()
        .nest_service("/api", api::routes(state))
        .nest_service("/media", get_service(ServeDir::new(media_root)))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
