//! Travis CI API client library.
//!
//! A Rust library for interacting with the Travis CI v3 REST API: it
//! authenticates with a token, lists build resources with optional
//! filters through transparent lazy pagination, and triggers new build
//! requests.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::BTreeMap;
//!
//! use travisapi::TravisClient;
//!
//! fn main() -> travisapi::Result<()> {
//!     // Create client from environment variables
//!     let client = TravisClient::from_env("rails", "rails")?;
//!
//!     // Walk builds lazily; pages are fetched as the iterator advances
//!     let mut filters = BTreeMap::new();
//!     filters.insert("state".to_string(), "passed".to_string());
//!     for build in client.builds(&filters)? {
//!         let build = build?;
//!         println!("build {}", build["number"]);
//!     }
//!
//!     // Trigger a build request on a branch
//!     let mut options = BTreeMap::new();
//!     options.insert("branch".to_string(), "main".to_string());
//!     let request = client.create_request(&options)?;
//!     println!("queued: {}", request["@type"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Resources are opaque [`serde_json::Value`] objects; the client relays
//! them untouched and only interprets the pagination metadata
//! (`@pagination.next.@href`) and the named resource array of each list
//! body. Listing returns [`Resources`], a forward-only iterator that
//! fetches one page per pull past its buffer — strictly sequential,
//! never prefetched. Stopping iteration early is the only cancellation
//! needed; no request is in flight between pulls.
//!
//! # Configuration
//!
//! [`TravisClient::from_env`] reads configuration from environment
//! variables:
//!
//! - `TRAVIS_TOKEN` (required) - Your Travis API token
//! - `TRAVIS_API_URL` (optional) - API root (defaults to `https://api.travis-ci.org`)

mod client;
mod error;
mod pagination;

// Re-export core types
pub use client::TravisClient;
pub use error::{Result, TravisError};
pub use pagination::Resources;
