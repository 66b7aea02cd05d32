use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use database::queries::route::{self, RouteFilter};
use model::{
    route::{Route, RouteDetail},
    WithId,
};
use serde::Deserialize;
use utility::id::Id;

use crate::{
    auth::{CurrentUser, StaffUser},
    common::{schema, ApiJson, ApiResult, Page, PageParams},
    middleware::base_url::BaseUrl,
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route(
            "/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route("/schema", get(schema::<WithId<RouteDetail>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    source: Option<String>,
    destination: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RoutePayload {
    source: i64,
    destination: i64,
    distance: f64,
}

impl RoutePayload {
    /// The mutation guard shared by create and update.
    fn into_validated(self) -> ApiResult<Route> {
        let route = Route {
            source: Id::new(self.source),
            destination: Id::new(self.destination),
            distance: self.distance,
        };
        route.validate()?;
        Ok(route)
    }
}

async fn list_routes(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<RouteQuery>,
) -> ApiResult<Json<Page<WithId<RouteDetail>>>> {
    let filter = RouteFilter {
        source: query.source,
        destination: query.destination,
    };
    let params = PageParams::new(query.page, query.per_page);

    let count = route::count(db.pool(), &filter).await?;
    let results =
        route::list_detail(db.pool(), &filter, params.per_page(), params.offset())
            .await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn get_route(
    State(WebState { db, .. }): State<WebState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<WithId<RouteDetail>>> {
    let detail = route::get_detail(db.pool(), Id::new(id)).await?;
    Ok(Json(detail))
}

async fn create_route(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<RoutePayload>,
) -> ApiResult<(StatusCode, Json<WithId<Route>>)> {
    let route = payload.into_validated()?;
    let created = route::insert(db.pool(), &route).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_route(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<RoutePayload>,
) -> ApiResult<Json<WithId<Route>>> {
    let route = payload.into_validated()?;
    let updated = route::update(db.pool(), Id::new(id), &route).await?;
    Ok(Json(updated))
}

async fn delete_route(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    route::delete(db.pool(), Id::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
