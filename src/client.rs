//! Travis API client.
//!
//! Low-level HTTP client that handles authentication and raw requests,
//! plus the two operations the API surface exposes: lazy resource
//! listing and build request creation.

use std::collections::BTreeMap;
use std::env;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Result, TravisError};
use crate::pagination::{filter_query, RawPage, Resources};

const DEFAULT_API_URL: &str = "https://api.travis-ci.org";
const USER_AGENT: &str = concat!("travisapi/", env!("CARGO_PKG_VERSION"));

/// Travis CI v3 API client for a single repository.
///
/// Handles authentication and HTTP requests against the repository
/// endpoint `/repo/{organization}%2F{repo}`. Listing is exposed as a
/// lazy iterator via [`list`](Self::list) and [`builds`](Self::builds);
/// build requests are triggered via
/// [`create_request`](Self::create_request).
///
/// This struct is cheaply cloneable; clones reference the same
/// underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use travisapi::TravisClient;
///
/// # fn example() -> travisapi::Result<()> {
/// // Create from environment variables
/// let client = TravisClient::from_env("rails", "rails")?;
///
/// // Or configure manually
/// let client = TravisClient::new("rails", "rails", "your-token", "https://api.travis-ci.org")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TravisClient {
    http: Client,
    organization: String,
    repo: String,
    host: Url,
    base_url: Url,
}

impl std::fmt::Debug for TravisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravisClient")
            .field("organization", &self.organization)
            .field("repo", &self.repo)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TravisClient {
    /// Create a client from environment variables.
    ///
    /// Uses `TRAVIS_TOKEN` for authentication and optionally
    /// `TRAVIS_API_URL` for the API root (defaults to
    /// `https://api.travis-ci.org`).
    ///
    /// # Errors
    ///
    /// Returns an error if `TRAVIS_TOKEN` is not set.
    pub fn from_env(organization: &str, repo: &str) -> Result<Self> {
        let token = env::var("TRAVIS_TOKEN").map_err(|_| {
            TravisError::ConfigMissing("TRAVIS_TOKEN environment variable not set".to_string())
        })?;

        let api_url = env::var("TRAVIS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(organization, repo, &token, &api_url)
    }

    /// Create a new client with the provided token and API root.
    ///
    /// # Arguments
    ///
    /// * `organization` - Organization or user the repository belongs to
    /// * `repo` - Repository name
    /// * `token` - Travis API token
    /// * `api_url` - API root (e.g., `https://api.travis-ci.org`)
    ///
    /// # Errors
    ///
    /// Returns an error if the API root is not a valid URL or the token
    /// cannot be used as a header value.
    pub fn new(organization: &str, repo: &str, token: &str, api_url: &str) -> Result<Self> {
        // Ensure the API root ends with / so joins keep its path.
        let api_url_str = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{api_url}/")
        };

        let host = Url::parse(&api_url_str)?;

        // Travis addresses repositories by slug with the separator
        // percent-encoded: /repo/rails%2Frails.
        let slug = urlencoding::encode(&format!("{organization}/{repo}")).into_owned();
        let base_url = host.join(&format!("repo/{slug}/"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("Travis-API-Version", HeaderValue::from_static("3"));
        let mut authorization = HeaderValue::from_str(&format!("token {token}"))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(TravisError::Http)?;

        Ok(Self {
            http,
            organization: organization.to_string(),
            repo: repo.to_string(),
            host,
            base_url,
        })
    }

    /// Get the organization the client is bound to.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Get the repository name the client is bound to.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Get the repository base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lazily list resources of the given kind, e.g. `"builds"`.
    ///
    /// Filters are serialized as `key=value` pairs joined with `&`; the
    /// ordered map keeps the query string deterministic. The query is
    /// appended only when at least one filter is present.
    ///
    /// The returned iterator fetches one page per pull past the current
    /// buffer and never prefetches. It is forward-only and single-pass;
    /// re-iterating requires a new `list` call.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource name does not form a valid URL.
    /// Page fetch failures surface as `Err` items of the iterator.
    pub fn list(&self, resource: &str, filters: &BTreeMap<String, String>) -> Result<Resources<'_>> {
        let mut start = self.base_url.join(resource)?;
        if let Some(query) = filter_query(filters) {
            start.set_query(Some(&query));
        }

        Ok(Resources::new(self, resource.to_string(), start))
    }

    /// Lazily list the repository's builds.
    ///
    /// Shorthand for [`list("builds", filters)`](Self::list).
    pub fn builds(&self, filters: &BTreeMap<String, String>) -> Result<Resources<'_>> {
        self.list("builds", filters)
    }

    /// Trigger a build request.
    ///
    /// Issues a POST to `/repo/{organization}%2F{repo}/requests` with the
    /// options wrapped in a top-level `request` object. Travis answers
    /// `202 Accepted` when the request is queued for processing; that is
    /// an acceptance, not a guarantee the build runs.
    ///
    /// # Errors
    ///
    /// Any status other than 202 returns [`TravisError::Api`] carrying
    /// the status code and the response body.
    #[tracing::instrument(skip(self, options))]
    pub fn create_request<B: Serialize>(&self, options: &B) -> Result<Value> {
        #[derive(Serialize)]
        struct RequestBody<'a, B> {
            request: &'a B,
        }

        let url = self.base_url.join("requests")?;

        let response = self
            .http
            .post(url)
            .json(&RequestBody { request: options })
            .send()
            .map_err(TravisError::Http)?;

        let status = response.status();
        let text = response.text().map_err(TravisError::Http)?;

        if status != StatusCode::ACCEPTED {
            // Prefer the decoded body for diagnostics, fall back to raw text.
            let body = match serde_json::from_str::<Value>(&text) {
                Ok(json) => json.to_string(),
                Err(_) => text,
            };
            return Err(TravisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch and decode one list page.
    #[tracing::instrument(skip(self))]
    pub(crate) fn get_page(&self, url: Url, resource: &str) -> Result<RawPage> {
        let response = self.http.get(url).send().map_err(TravisError::Http)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(TravisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().map_err(TravisError::Http)?;
        RawPage::from_body(body, resource, &self.host)
    }
}
