// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use std::{error, fmt};

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service). A service might not always
/// be remote, such as when the implementation is a deterministic service
/// used for testing.
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    ///
    /// Requests made with the client give up after `timeout`.
    fn client(timeout: Duration) -> HTTPResult<Client> {
        ClientBuilder::new()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(HTTPError::Client)
    }

    /// An appropriate user agent to use when making HTTP requests.
    fn user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// A response to an HTTP request whose body has been read in full.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    /// Creates a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status,
            headers,
            body,
        }
    }

    /// The response's status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response's headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of the header `name` parsed as an integer, if it is present
    /// and numeric.
    pub fn header_i64(&self, name: &str) -> Option<i64> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    /// The response body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
///
/// These are transport failures; a response with an unsuccessful status
/// code is still a [`Response`].
#[derive(Debug)]
pub enum HTTPError {
    /// The HTTP client could not be created.
    Client(reqwest::Error),

    /// An error that occurred while making an HTTP request, including
    /// connection failures and timeouts.
    Request(reqwest::Error),

    /// An error retrieving the body of a response.
    Body(reqwest::Error),
}

impl fmt::Display for HTTPError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HTTPError::Client(err) => write!(f, "Error creating HTTP client: {err}"),
            HTTPError::Request(err) => write!(f, "Error while making HTTP request: {err}"),
            HTTPError::Body(err) => write!(f, "Error retrieving body of HTTP response: {err}"),
        }
    }
}

impl error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HTTPError::Client(err) => Some(err),
            HTTPError::Request(err) => Some(err),
            HTTPError::Body(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use reqwest::header::HeaderValue;

    #[allow(dead_code)]
    struct UserAgentTestService {}
    impl HTTPService for UserAgentTestService {}

    #[test]
    fn it_returns_user_agent_with_version_number() {
        let user_agent = UserAgentTestService::user_agent();
        let version_re = Regex::new(r"^[a-z]+ v\d+\.\d+\.\d+(-(alpha|beta)\.\d+)?$").unwrap();
        assert!(
            version_re.is_match(&user_agent),
            "{} does not match {}",
            user_agent,
            version_re,
        );
    }

    #[test]
    fn it_creates_a_client() {
        assert!(UserAgentTestService::client(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn it_parses_numeric_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-reset", HeaderValue::from_static("1748020380"));
        let response = Response::new(StatusCode::OK, headers, "");
        assert_eq!(response.header_i64("x-rate-limit-reset"), Some(1748020380));
    }

    #[test]
    fn it_ignores_non_numeric_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-reset", HeaderValue::from_static("soon"));
        let response = Response::new(StatusCode::OK, headers, "");
        assert_eq!(response.header_i64("x-rate-limit-reset"), None);
    }

    #[test]
    fn it_ignores_missing_headers() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), "");
        assert_eq!(response.header_i64("x-rate-limit-reset"), None);
    }
}
