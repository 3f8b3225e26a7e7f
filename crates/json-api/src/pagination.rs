//! Pagination query parameters and cursor links.

use salvo::{
    http::uri::Uri,
    oapi::{ToSchema, extract::QueryParam},
};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use shop_app::pagination::{Cursors, PageRequest};

/// Build a normalized page request from the listing query parameters.
pub(crate) fn page_request(
    per_page: QueryParam<i64, false>,
    before: QueryParam<i64, false>,
    after: QueryParam<i64, false>,
) -> PageRequest {
    PageRequest::new(
        per_page.into_inner().unwrap_or_default(),
        before.into_inner().unwrap_or_default(),
        after.into_inner().unwrap_or_default(),
    )
}

/// Links to the neighbouring pages of a listing.
///
/// Cursor URLs are origin-relative (`/items?after=20`); resolve them against
/// the API host.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    /// Origin-relative URL of the newer neighbour page
    pub cursor_before: Option<String>,

    /// Origin-relative URL of the older neighbour page
    pub cursor_after: Option<String>,

    /// Id to pass as `before` for the newer neighbour page
    pub before: Option<String>,

    /// Id to pass as `after` for the older neighbour page
    pub after: Option<String>,
}

impl PaginationResponse {
    /// Render cursors relative to the URI of the current request.
    pub(crate) fn from_cursors(uri: &Uri, cursors: Cursors) -> Self {
        Self {
            cursor_before: cursors.before.map(|id| cursor_url(uri, "before", id)),
            cursor_after: cursors.after.map(|id| cursor_url(uri, "after", id)),
            before: cursors.before.map(|id| id.to_string()),
            after: cursors.after.map(|id| id.to_string()),
        }
    }
}

/// The request URI with `key` set to `id` and the other cursor removed.
fn cursor_url(uri: &Uri, key: &str, id: i64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(existing) = uri.query() {
        query.extend_pairs(
            form_urlencoded::parse(existing.as_bytes())
                .filter(|(name, _)| name != "before" && name != "after"),
        );
    }

    query.append_pair(key, &id.to_string());

    format!("{}?{}", uri.path(), query.finish())
}
