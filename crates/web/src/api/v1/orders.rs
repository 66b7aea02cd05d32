use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use database::queries::order;
use model::{
    order::{OrderSummary, TicketRequest},
    WithId,
};
use serde::Deserialize;

use crate::{
    auth::CurrentUser,
    common::{schema, ApiJson, ApiResult, Page, PageParams},
    middleware::base_url::BaseUrl,
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/schema", get(schema::<WithId<OrderSummary>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct OrderQuery {
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OrderPayload {
    tickets: Vec<TicketRequest>,
}

/// Orders are scoped to the caller; there is no way to read or modify
/// another account's bookings.
async fn list_orders(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Json<Page<WithId<OrderSummary>>>> {
    let params = PageParams::new(query.page, query.per_page);

    let count = order::count_for_user(db.pool(), user.id).await?;
    let results =
        order::list_for_user(db.pool(), user.id, params.per_page(), params.offset())
            .await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn create_order(
    State(WebState { db, .. }): State<WebState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<OrderPayload>,
) -> ApiResult<(StatusCode, Json<WithId<OrderSummary>>)> {
    let id = order::create(db.pool(), user.id, &payload.tickets).await?;
    let created = order::get_for_user(db.pool(), user.id, id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
