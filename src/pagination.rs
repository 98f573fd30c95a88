//! Pagination for Travis API list responses.
//!
//! List bodies carry the requested resources under a key named after the
//! resource (`"builds": [...]`) plus `@pagination` metadata whose
//! `next.@href` link points at the following page, or is null on the
//! last one. [`Resources`] walks those links lazily, one blocking fetch
//! per page, as the consumer pulls items.

use std::collections::{BTreeMap, VecDeque};

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::client::TravisClient;
use crate::error::{Result, TravisError};

/// Pagination metadata of a list response.
#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    next: Option<NextLink>,
}

/// The provider-supplied link to the next page, an absolute path on the
/// API host.
#[derive(Debug, Deserialize)]
struct NextLink {
    #[serde(rename = "@href")]
    href: String,
}

/// One decoded list page: its items and the resolved next-page URL.
#[derive(Debug)]
pub(crate) struct RawPage {
    pub(crate) items: Vec<Value>,
    pub(crate) next: Option<Url>,
}

impl RawPage {
    /// Split a decoded list body into the named resource array and the
    /// next-page cursor, resolving the `@href` path against the API host.
    ///
    /// A body without `@pagination` counts as a terminal page; a body
    /// without the resource array is malformed.
    pub(crate) fn from_body(mut body: Value, resource: &str, host: &Url) -> Result<Self> {
        let items = match body.get_mut(resource).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(TravisError::UnexpectedBody {
                    resource: resource.to_string(),
                })
            }
        };

        let pagination = match body.get("@pagination") {
            Some(meta) => serde_json::from_value::<Pagination>(meta.clone())?,
            None => Pagination::default(),
        };

        let next = match pagination.next {
            Some(link) => Some(host.join(&link.href)?),
            None => None,
        };

        Ok(Self { items, next })
    }
}

/// Serialize a filter mapping as `key=value` pairs joined with `&`.
///
/// Returns `None` when no filters are present; the ordered map makes the
/// result deterministic.
pub(crate) fn filter_query(filters: &BTreeMap<String, String>) -> Option<String> {
    if filters.is_empty() {
        return None;
    }

    let query = filters
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    Some(query)
}

/// Lazy, forward-only iterator over a paginated list result.
///
/// Items of the current page are buffered and handed out one by one;
/// when the buffer drains and the previous page carried a next link, the
/// following page is fetched with a blocking GET at that pull. Pages are
/// never prefetched, and dropping the iterator early simply stops — no
/// request is in flight between pulls.
///
/// A page fetch that fails (non-200 status or malformed body) is yielded
/// once as `Err`; the iterator is terminally failed afterwards and
/// yields nothing further. Items already yielded from prior pages remain
/// valid.
pub struct Resources<'a> {
    client: &'a TravisClient,
    resource: String,
    buffered: VecDeque<Value>,
    next_url: Option<Url>,
    failed: bool,
}

impl<'a> Resources<'a> {
    pub(crate) fn new(client: &'a TravisClient, resource: String, start: Url) -> Self {
        Self {
            client,
            resource,
            buffered: VecDeque::new(),
            next_url: Some(start),
            failed: false,
        }
    }
}

impl Iterator for Resources<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }

            if self.failed {
                return None;
            }

            // No buffered items and no next link: exhausted.
            let url = self.next_url.take()?;

            match self.client.get_page(url, &self.resource) {
                Ok(page) => {
                    self.buffered.extend(page.items);
                    self.next_url = page.next;
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Resources<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host() -> Url {
        Url::parse("https://api.travis-ci.org").unwrap()
    }

    #[test]
    fn test_filter_query_empty() {
        assert_eq!(filter_query(&BTreeMap::new()), None);
    }

    #[test]
    fn test_filter_query_joins_sorted_pairs() {
        let mut filters = BTreeMap::new();
        filters.insert("state".to_string(), "passed".to_string());
        filters.insert("branch.name".to_string(), "main".to_string());
        filters.insert("limit".to_string(), "5".to_string());

        assert_eq!(
            filter_query(&filters).as_deref(),
            Some("branch.name=main&limit=5&state=passed")
        );
    }

    #[test]
    fn test_page_with_next_link() {
        let body = json!({
            "builds": [{"id": 1}, {"id": 2}],
            "@pagination": {
                "next": {"@href": "/repo/rails%2Frails/builds?limit=2&offset=2"}
            }
        });

        let page = RawPage::from_body(body, "builds", &host()).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(
            page.next.unwrap().as_str(),
            "https://api.travis-ci.org/repo/rails%2Frails/builds?limit=2&offset=2"
        );
    }

    #[test]
    fn test_page_with_null_next_link() {
        let body = json!({
            "builds": [{"id": 3}],
            "@pagination": {"next": null}
        });

        let page = RawPage::from_body(body, "builds", &host()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.next.is_none());
    }

    #[test]
    fn test_page_without_pagination_metadata() {
        let body = json!({"builds": []});

        let page = RawPage::from_body(body, "builds", &host()).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_page_missing_resource_array() {
        let body = json!({
            "requests": [{"id": 9}],
            "@pagination": {"next": null}
        });

        let err = RawPage::from_body(body, "builds", &host()).unwrap_err();
        assert!(matches!(
            err,
            TravisError::UnexpectedBody { resource } if resource == "builds"
        ));
    }
}
