use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use database::queries::station::{self, StationFilter};
use model::{station::Station, WithId};
use serde::Deserialize;

use crate::{
    auth::{CurrentUser, StaffUser},
    common::{schema, ApiJson, ApiResult, Page, PageParams},
    middleware::base_url::BaseUrl,
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_stations).post(create_station))
        .route("/schema", get(schema::<WithId<Station>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StationQuery {
    name: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StationPayload {
    name: String,
    latitude: f64,
    longitude: f64,
}

async fn list_stations(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Page<WithId<Station>>>> {
    let filter = StationFilter { name: query.name };
    let params = PageParams::new(query.page, query.per_page);

    let count = station::count(db.pool(), &filter).await?;
    let results =
        station::list(db.pool(), &filter, params.per_page(), params.offset())
            .await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn create_station(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<StationPayload>,
) -> ApiResult<(StatusCode, Json<WithId<Station>>)> {
    let station = Station {
        name: payload.name,
        latitude: payload.latitude,
        longitude: payload.longitude,
    };
    station.validate()?;

    let created = station::insert(db.pool(), &station).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
