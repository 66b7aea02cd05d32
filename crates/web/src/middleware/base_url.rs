use std::sync::Arc;

use axum::{
    extract::{self},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::IntoResponse,
};

/// The externally visible origin of the service, reconstructed from the
/// reverse proxy's forwarding headers. Used to render absolute pagination
/// links.
#[derive(Debug, Clone)]
pub struct BaseUrl {
    proto: String,
    host: String,
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http")
            .to_string();

        let host = headers
            .get("x-forwarded-host")
            .and_then(|value| value.to_str().ok())
            .or_else(|| headers.get("host").and_then(|value| value.to_str().ok()))
            .unwrap_or("localhost")
            .to_string();

        BaseUrl { proto, host }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(proto: &str, host: &str) -> Self {
        BaseUrl {
            proto: proto.to_owned(),
            host: host.to_owned(),
        }
    }

    pub fn full_url<S: AsRef<str>>(&self, path: S) -> String {
        format!("{}://{}{}", self.proto, self.host, path.as_ref())
    }

    /// The absolute URL of `uri` with its `page` parameter replaced. Every
    /// other query parameter is kept as sent.
    pub fn page_url(&self, uri: &Uri, page: i64) -> String {
        let mut params: Vec<String> = uri
            .query()
            .map(|query| {
                query
                    .split('&')
                    .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        params.push(format!("page={}", page));
        self.full_url(format!("{}?{}", uri.path(), params.join("&")))
    }
}

pub async fn base_url_middleware(
    req: extract::Request,
    next: Next,
) -> impl IntoResponse {
    let base_url = BaseUrl::from_headers(req.headers());

    let mut req = req;
    req.extensions_mut().insert(Arc::new(base_url));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honors_forwarding_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        headers.insert("x-forwarded-host", "booking.example.com".parse().unwrap());
        let base_url = BaseUrl::from_headers(&headers);
        assert_eq!(
            base_url.full_url("/api/ping"),
            "https://booking.example.com/api/ping"
        );
    }

    #[test]
    fn falls_back_to_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert("host", "localhost:8080".parse().unwrap());
        let base_url = BaseUrl::from_headers(&headers);
        assert_eq!(base_url.full_url("/"), "http://localhost:8080/");
    }

    #[test]
    fn page_url_replaces_only_the_page_parameter() {
        let base_url = BaseUrl::for_tests("http", "localhost");
        let uri: Uri = "/trips?page=5&available=true".parse().unwrap();
        assert_eq!(
            base_url.page_url(&uri, 6),
            "http://localhost/trips?available=true&page=6"
        );
    }

    #[test]
    fn page_url_without_existing_query() {
        let base_url = BaseUrl::for_tests("http", "localhost");
        let uri: Uri = "/trips".parse().unwrap();
        assert_eq!(base_url.page_url(&uri, 2), "http://localhost/trips?page=2");
    }
}
