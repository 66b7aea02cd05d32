use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::FromRequest,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use database::StoreError;
use model::DomainError;
use schemars::JsonSchema;
use serde::Serialize;

use crate::middleware::base_url::BaseUrl;

pub type ApiResult<O> = Result<O, ApiError>;

/// An error response in the field-keyed shape clients expect: either a map
/// of field name to reasons (object-level failures go under
/// `non_field_errors`) or a single `detail` message.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    #[serde(flatten)]
    pub body: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Fields(BTreeMap<String, Vec<String>>),
    Detail { detail: String },
}

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::Fields(fields),
        }
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self::validation(NON_FIELD_ERRORS, message)
    }

    pub fn detail(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::Detail {
                detail: message.into(),
            },
        }
    }

    pub fn not_found() -> Self {
        Self::detail(StatusCode::NOT_FOUND, "Not found.")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::detail(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden() -> Self {
        Self::detail(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        )
    }

    pub fn internal() -> Self {
        Self::detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error.",
        )
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error.field() {
            Some(field) => Self::validation(field, error.to_string()),
            None => Self::non_field(error.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::not_found(),
            StoreError::Conflict(message) => Self::non_field(message),
            StoreError::Domain(domain) => domain.into(),
            other => {
                tracing::error!("storage failure: {other}");
                Self::internal()
            }
        }
    }
}

impl From<crate::media::MediaError> for ApiError {
    fn from(error: crate::media::MediaError) -> Self {
        match error {
            crate::media::MediaError::Io(why) => {
                tracing::error!("media storage failure: {why}");
                Self::internal()
            }
            other => Self::validation("image", other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::detail(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// JSON body extractor whose rejection is rendered through [`ApiError`]
/// instead of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// - Pagination -

pub const DEFAULT_PER_PAGE: u32 = 5;
pub const MAX_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    page: i64,
    per_page: i64,
}

impl PageParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let per_page = per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        Self {
            page: page.unwrap_or(1).max(1) as i64,
            per_page: per_page as i64,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Envelope for list endpoints. `next`/`previous` are absolute URLs of the
/// adjacent pages, preserving every other query parameter.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Page<T> {
    pub pages: i64,
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(
        results: Vec<T>,
        count: i64,
        params: &PageParams,
        base_url: &Arc<BaseUrl>,
        uri: &Uri,
    ) -> Self {
        let pages = if count == 0 {
            1
        } else {
            (count + params.per_page() - 1) / params.per_page()
        };
        let page = params.page();
        let next = (page < pages).then(|| base_url.page_url(uri, page + 1));
        let previous = (page > 1).then(|| base_url.page_url(uri, page - 1));
        Self {
            pages,
            count,
            next,
            previous,
            results,
        }
    }
}

/// Serves the JSON Schema of a resource's read representation.
pub(crate) async fn schema<T: JsonSchema>() -> Json<schemars::schema::RootSchema> {
    Json(schemars::schema_for!(T))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Arc<BaseUrl> {
        Arc::new(BaseUrl::for_tests("http", "localhost:8080"))
    }

    #[test]
    fn page_params_defaults_and_caps() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE as i64);
        assert_eq!(params.offset(), 0);

        let params = PageParams::new(Some(3), Some(100));
        assert_eq!(params.per_page(), MAX_PER_PAGE as i64);
        assert_eq!(params.offset(), 20);

        let params = PageParams::new(Some(0), Some(0));
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 1);
    }

    #[test]
    fn page_math() {
        let uri: Uri = "/api/v1/train-station/stations?page=2".parse().unwrap();
        let params = PageParams::new(Some(2), Some(5));
        let page: Page<i32> = Page::new(vec![1, 2, 3, 4, 5], 12, &params, &base_url(), &uri);
        assert_eq!(page.pages, 3);
        assert_eq!(page.count, 12);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8080/api/v1/train-station/stations?page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://localhost:8080/api/v1/train-station/stations?page=1")
        );
    }

    #[test]
    fn first_and_last_page_have_no_dangling_links() {
        let uri: Uri = "/stations".parse().unwrap();
        let params = PageParams::new(Some(1), Some(5));
        let page: Page<i32> = Page::new(vec![], 3, &params, &base_url(), &uri);
        assert_eq!(page.pages, 1);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn empty_listing_still_reports_one_page() {
        let uri: Uri = "/stations".parse().unwrap();
        let params = PageParams::new(None, None);
        let page: Page<i32> = Page::new(vec![], 0, &params, &base_url(), &uri);
        assert_eq!(page.pages, 1);
        assert_eq!(page.count, 0);
    }

    #[test]
    fn page_links_preserve_other_query_parameters() {
        let uri: Uri = "/trips?source=kiel&page=2&available=true".parse().unwrap();
        let params = PageParams::new(Some(2), Some(5));
        let page: Page<i32> = Page::new(vec![0; 5], 20, &params, &base_url(), &uri);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8080/trips?source=kiel&available=true&page=3")
        );
    }

    #[test]
    fn field_errors_serialize_as_a_map() {
        let error = ApiError::validation("cargo", "cargo number must be in range (1, 3)");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cargo": ["cargo number must be in range (1, 3)"]
            })
        );
    }

    #[test]
    fn object_level_errors_use_non_field_errors() {
        let error: ApiError = DomainError::SameSourceDestination.into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "non_field_errors": [
                    "the source and destination stations must be different"
                ]
            })
        );
    }

    #[test]
    fn detail_errors_serialize_with_detail_key() {
        let error = ApiError::not_found();
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, serde_json::json!({ "detail": "Not found." }));
    }

    #[test]
    fn store_conflicts_map_to_bad_request() {
        let error: ApiError = StoreError::Conflict(
            "the fields cargo, seat, trip must make a unique set".to_owned(),
        )
        .into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let error: ApiError = StoreError::NotFound.into();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }
}
