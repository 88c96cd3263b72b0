//! Raw query-string access for list endpoints.
//!
//! List endpoints accept repeated keys (`?tags=lunch&tags=dinner`) and must
//! treat unparseable pagination values as absent, so they read the query as
//! ordered key/value pairs instead of a typed `Query<T>`.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use foodgram_core::pagination::{Page, PageRequest};
use serde::Serialize;

/// The request path plus its decoded query pairs, in order.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    path: String,
    pairs: Vec<(String, String)>,
}

impl<S: Send + Sync> FromRequestParts<S> for ListQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI; links must use the full path.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        Ok(Self::new(uri.path(), uri.query()))
    }
}

impl ListQuery {
    /// Malformed query strings are treated as empty.
    pub fn new(path: &str, raw_query: Option<&str>) -> Self {
        let pairs = raw_query
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .unwrap_or_default();
        Self {
            path: path.to_string(),
            pairs,
        }
    }

    /// First value of `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every non-empty value of `key`, in order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// A boolean flag such as `is_favorited=1`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.first(key), Some("1" | "true" | "True"))
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.first("page"), self.first("limit"))
    }

    /// Wrap one page of results in the `{count, next, previous, results}`
    /// envelope, with links pointing at this same request.
    pub fn page_of<T: Serialize>(&self, request: PageRequest, count: i64, results: Vec<T>) -> Page<T> {
        Page {
            count,
            next: request
                .has_next(count)
                .then(|| self.link_to(request.page + 1)),
            previous: request
                .has_previous()
                .then(|| self.link_to(request.page - 1)),
            results,
        }
    }

    /// This request's URL with `page` replaced.
    fn link_to(&self, page: i64) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != "page")
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        pairs.push(("page", page.to_string()));
        let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
        format!("{}?{query}", self.path)
    }
}
