use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use database::queries::train_type::{self, TrainTypeFilter};
use model::{train::TrainType, WithId};
use serde::Deserialize;

use crate::{
    auth::{CurrentUser, StaffUser},
    common::{schema, ApiJson, ApiResult, Page, PageParams},
    middleware::base_url::BaseUrl,
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_train_types).post(create_train_type))
        .route("/schema", get(schema::<WithId<TrainType>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TrainTypeQuery {
    name: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TrainTypePayload {
    name: String,
}

async fn list_train_types(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<TrainTypeQuery>,
) -> ApiResult<Json<Page<WithId<TrainType>>>> {
    let filter = TrainTypeFilter { name: query.name };
    let params = PageParams::new(query.page, query.per_page);

    let count = train_type::count(db.pool(), &filter).await?;
    let results =
        train_type::list(db.pool(), &filter, params.per_page(), params.offset())
            .await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn create_train_type(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<TrainTypePayload>,
) -> ApiResult<(StatusCode, Json<WithId<TrainType>>)> {
    let train_type = TrainType { name: payload.name };
    train_type.validate()?;

    let created = train_type::insert(db.pool(), &train_type).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
