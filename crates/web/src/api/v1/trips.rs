use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use database::queries::trip::{self, TripFilter};
use model::{
    trip::{Trip, TripDetail, TripSummary},
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
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/schema", get(schema::<WithId<TripSummary>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TripQuery {
    departure_date: Option<NaiveDate>,
    source: Option<String>,
    destination: Option<String>,
    train_type: Option<String>,
    available: Option<bool>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TripPayload {
    route: i64,
    train: i64,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    #[serde(default)]
    crew: Vec<i64>,
}

impl TripPayload {
    /// The mutation guard shared by create and update.
    fn into_validated(self) -> ApiResult<(Trip, Vec<Id<model::crew::Crew>>)> {
        let trip = Trip {
            route: Id::new(self.route),
            train: Id::new(self.train),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
        };
        trip.validate()?;
        let crew = self.crew.into_iter().map(Id::new).collect();
        Ok((trip, crew))
    }
}

async fn list_trips(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<TripQuery>,
) -> ApiResult<Json<Page<WithId<TripSummary>>>> {
    let filter = TripFilter {
        departure_date: query.departure_date,
        source: query.source,
        destination: query.destination,
        train_type: query.train_type,
        available: query.available,
    };
    let params = PageParams::new(query.page, query.per_page);

    let count = trip::count(db.pool(), &filter).await?;
    let results =
        trip::list(db.pool(), &filter, params.per_page(), params.offset()).await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn get_trip(
    State(WebState { db, .. }): State<WebState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<WithId<TripDetail>>> {
    let detail = trip::get_detail(db.pool(), Id::new(id)).await?;
    Ok(Json(detail))
}

async fn create_trip(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<TripPayload>,
) -> ApiResult<(StatusCode, Json<WithId<Trip>>)> {
    let (trip, crew) = payload.into_validated()?;
    let created = trip::insert(db.pool(), &trip, &crew).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_trip(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<TripPayload>,
) -> ApiResult<Json<WithId<Trip>>> {
    let (trip, crew) = payload.into_validated()?;
    let updated = trip::update(db.pool(), Id::new(id), &trip, &crew).await?;
    Ok(Json(updated))
}

async fn delete_trip(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    trip::delete(db.pool(), Id::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
