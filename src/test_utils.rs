// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use crate::clock::{Clock, DateTime, Utc};
use crate::credentials::{CredentialStore, Credentials};
use crate::http::{HTTPResult, Response};
use crate::oauth::SignedRequest;
use crate::twitter::Service;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// Credentials from Twitter's "Creating a signature" developer guide.
pub fn test_credentials() -> Credentials {
    Credentials::new(
        "xvz1evFS4wEEPTGEFPHBog",
        "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
        "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
    )
    .expect("invalid test credentials")
}

/// Writes the test credentials to a file in a new temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn credentials_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("could not create temporary directory");
    let path = dir.path().join("credentials");
    CredentialStore::new(&path)
        .save(&test_credentials())
        .expect("could not save test credentials");
    (dir, path)
}

/// Answers every request with the same canned response.
pub struct TestService {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    last_request: Mutex<Option<SignedRequest>>,
}

impl TestService {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            last_request: Mutex::new(None),
        }
    }

    /// Responds successfully with the contents of `tests/data/{file}.json`.
    pub fn ok(file: &str) -> Self {
        Self::new(StatusCode::OK, load_data(file))
    }

    /// Responds as Twitter does when a rate limit is exceeded.
    pub fn rate_limited(reset_at: i64) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, load_data("rate_limited"))
            .header("x-rate-limit-remaining", "0")
            .header("x-rate-limit-reset", &reset_at.to_string())
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::from_bytes(name.as_bytes()).expect("invalid header name");
        let value = HeaderValue::from_str(value).expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    pub fn last_request(&self) -> Option<SignedRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Service for TestService {
    async fn send(&self, request: &SignedRequest) -> HTTPResult<Response> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(Response::new(
            self.status,
            self.headers.clone(),
            self.body.clone(),
        ))
    }
}

#[derive(Debug)]
pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
