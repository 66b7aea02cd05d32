use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use database::queries::crew::{self, CrewFilter, NameMatch};
use model::{crew::Crew, WithId};
use serde::Deserialize;
use utility::id::Id;

use crate::{
    auth::{CurrentUser, StaffUser},
    common::{schema, ApiError, ApiJson, ApiResult, Page, PageParams},
    media::MediaStore,
    middleware::base_url::BaseUrl,
    WebState,
};

const UPLOAD_BODY_LIMIT: usize = 4 * 1024 * 1024;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_crews).post(create_crew))
        .route("/:id", get(get_crew).put(update_crew).delete(delete_crew))
        .route(
            "/:id/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/schema", get(schema::<WithId<Crew>>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CrewQuery {
    name: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CrewPayload {
    first_name: String,
    last_name: String,
}

impl CrewPayload {
    fn into_validated(self, image: Option<String>) -> ApiResult<Crew> {
        let crew = Crew {
            first_name: self.first_name,
            last_name: self.last_name,
            image,
        };
        crew.validate()?;
        Ok(crew)
    }
}

async fn list_crews(
    OriginalUri(uri): OriginalUri,
    State(WebState { db, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    _user: CurrentUser,
    Query(query): Query<CrewQuery>,
) -> ApiResult<Json<Page<WithId<Crew>>>> {
    let filter = CrewFilter {
        name: query.name.as_deref().and_then(NameMatch::parse),
    };
    let params = PageParams::new(query.page, query.per_page);

    let count = crew::count(db.pool(), &filter).await?;
    let results =
        crew::list(db.pool(), &filter, params.per_page(), params.offset()).await?;

    Ok(Json(Page::new(results, count, &params, &base_url, &uri)))
}

async fn get_crew(
    State(WebState { db, .. }): State<WebState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<WithId<Crew>>> {
    let crew = crew::get(db.pool(), Id::new(id)).await?;
    Ok(Json(crew))
}

async fn create_crew(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    ApiJson(payload): ApiJson<CrewPayload>,
) -> ApiResult<(StatusCode, Json<WithId<Crew>>)> {
    let crew = payload.into_validated(None)?;
    let created = crew::insert(db.pool(), &crew).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_crew(
    State(WebState { db, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<CrewPayload>,
) -> ApiResult<Json<WithId<Crew>>> {
    let crew = payload.into_validated(None)?;
    let updated = crew::update(db.pool(), Id::new(id), &crew).await?;
    Ok(Json(updated))
}

async fn delete_crew(
    State(WebState { db, media, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let image = crew::delete(db.pool(), Id::new(id)).await?;
    cleanup_image(&media, image).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_image(
    State(WebState { db, media, .. }): State<WebState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<Json<WithId<Crew>>> {
    let crew = crew::get(db.pool(), Id::new(id)).await?;

    let (file_name, bytes) = read_image_field(multipart).await?;
    let stored = media
        .save("crews", &crew.content.full_name(), &file_name, &bytes)
        .await?;

    let updated = crew::set_image(db.pool(), crew.id, &stored).await?;
    Ok(Json(updated))
}

/// Pulls the `image` part out of a multipart upload.
pub(crate) async fn read_image_field(
    mut multipart: Multipart,
) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|why| ApiError::validation("image", why.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|why| ApiError::validation("image", why.to_string()))?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(ApiError::validation("image", "no image field in upload"))
}

/// Best-effort removal of a record's stored image after the row is gone.
pub(crate) async fn cleanup_image(media: &MediaStore, image: Option<String>) {
    if let Some(image) = image {
        if let Err(why) = media.delete(&image).await {
            tracing::warn!("could not remove stored image {image}: {why}");
        }
    }
}
