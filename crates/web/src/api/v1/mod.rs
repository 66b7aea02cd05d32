use axum::Router;

use crate::{
    common::ApiError, middleware::base_url::base_url_middleware, WebState,
};

mod crews;
mod orders;
mod routes;
mod stations;
mod train_types;
mod trains;
mod trips;
mod users;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service(
            "/train-station/stations",
            stations::routes(state.clone()),
        )
        .nest_service("/train-station/routes", routes::routes(state.clone()))
        .nest_service("/train-station/crews", crews::routes(state.clone()))
        .nest_service(
            "/train-station/train-types",
            train_types::routes(state.clone()),
        )
        .nest_service("/train-station/trains", trains::routes(state.clone()))
        .nest_service("/train-station/trips", trips::routes(state.clone()))
        .nest_service("/train-station/orders", orders::routes(state.clone()))
        .nest_service("/user", users::routes(state))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .fallback(fallback)
}

async fn fallback() -> ApiError {
    ApiError::not_found()
}
