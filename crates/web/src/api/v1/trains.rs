use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use database::queries::train::{self, TrainFilter};
use model::{
    train::{Train, TrainDetail},
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

use super::crews::{cleanup_image, read_image_field};

const UPLOAD_BODY_LIMIT: usize = 4 * 1024 * 1024;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_trains).post(create_train))
        .route(
            "/:id",
            get(get_train).put(update_train).delete(delete_train),
        )
        .route(
            "/:id/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/schema", get(schema::<WithId<TrainDetail>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TrainQuery {
    train_type: Option<String>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TrainPayload {
    name: String,
    cargo_num: i32,
    places_in_cargo: i32,
    train_type: i64,
}

impl TrainPayload {
    fn into_validated(self, image: Option<String>) -> ApiResult<Train> {
        let train = Train {
            name: self.name,
            cargo_num: self.cargo_num,
            places_in_cargo: self.places_in_cargo,
            train_type_id: Id::new(self.train_type),
            image,
        };
        train.validate()?;
        Ok(train)
    }
}

async fn list_trains(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<TrainQuery>,
) -> ApiResult<Json<Page<WithId<TrainDetail>>>> {
    let filter = TrainFilter {
        train_type: query.train_type,
        min_capacity: query.min_capacity,
        max_capacity: query.max_capacity,
    };
    let params = PageParams::new(query.page, query.per_page);

    let count = train::count(db.pool(), &filter).await?;
    let results =
        train::list_detail(db.pool(), &filter, params.per_page(), params.offset())
            .await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn get_train(
    State(WebState { db, .. }): State<WebState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<WithId<TrainDetail>>> {
    let detail = train::get_detail(db.pool(), Id::new(id)).await?;
    Ok(Json(detail))
}

async fn create_train(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<TrainPayload>,
) -> ApiResult<(StatusCode, Json<WithId<Train>>)> {
    let train = payload.into_validated(None)?;
    let created = train::insert(db.pool(), &train).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_train(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<TrainPayload>,
) -> ApiResult<Json<WithId<Train>>> {
    let train = payload.into_validated(None)?;
    let updated = train::update(db.pool(), Id::new(id), &train).await?;
    Ok(Json(updated))
}

async fn delete_train(
    State(WebState { db, media, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let image = train::delete(db.pool(), Id::new(id)).await?;
    cleanup_image(&media, image).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_image(
    State(WebState { db, media, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<Json<WithId<Train>>> {
    let train = train::get(db.pool(), Id::new(id)).await?;

    let (file_name, bytes) = read_image_field(multipart).await?;
    let stored = media
        .save("trains", &train.content.name, &file_name, &bytes)
        .await?;

    let updated = train::set_image(db.pool(), train.id, &stored).await?;
    Ok(Json(updated))
}
