//! Tests for token and API-root sourcing from the environment.
//!
//! Both phases mutate `TRAVIS_TOKEN`, so they live in a single test
//! function to keep the process's environment consistent.

use std::collections::BTreeMap;
use std::env;

use serde_json::json;
use travisapi::{TravisClient, TravisError};

#[test]
fn test_token_sourcing_from_environment() {
    // Without a token, construction fails up front
    env::remove_var("TRAVIS_TOKEN");
    env::remove_var("TRAVIS_API_URL");
    let err = TravisClient::from_env("rails", "rails").unwrap_err();
    assert!(matches!(err, TravisError::ConfigMissing(_)));

    // With a token, it is the one sent in the Authorization header
    let mut server = mockito::Server::new();
    env::set_var("TRAVIS_TOKEN", "env-token");
    env::set_var("TRAVIS_API_URL", server.url());

    let mock = server
        .mock("GET", "/repo/rails%2Frails/builds")
        .match_header("authorization", "token env-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"builds": [], "@pagination": {"next": null}}).to_string())
        .create();

    let client = TravisClient::from_env("rails", "rails").unwrap();
    let builds: Vec<_> = client
        .builds(&BTreeMap::new())
        .unwrap()
        .collect::<travisapi::Result<_>>()
        .unwrap();

    assert!(builds.is_empty());
    mock.assert();

    env::remove_var("TRAVIS_TOKEN");
    env::remove_var("TRAVIS_API_URL");
}

#[test]
fn test_explicit_token_used_in_authorization_header() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/repo/rails%2Frails/builds")
        .match_header("authorization", "token explicit-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"builds": [], "@pagination": {"next": null}}).to_string())
        .create();

    let client = TravisClient::new("rails", "rails", "explicit-token", &server.url()).unwrap();
    let builds: Vec<_> = client
        .builds(&BTreeMap::new())
        .unwrap()
        .collect::<travisapi::Result<_>>()
        .unwrap();

    assert!(builds.is_empty());
    mock.assert();
}
