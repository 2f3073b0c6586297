// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Twitter API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Twitter API over HTTPS: they send an already
//! [signed](crate::oauth) request and hand back the raw response.

use crate::http::{HTTPError, HTTPResult, HTTPService, Response};
use crate::oauth::SignedRequest;
use log::debug;
use reqwest::{Client, header};
use std::time::Duration;

/// A service for sending signed requests to the Twitter API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Twitter API, such as an actual connector for production code,
/// and a canned connector for testing purposes.
pub trait Service {
    /// Sends `request` and returns the response, whatever its status.
    ///
    /// Only transport failures are errors.
    fn send(&self, request: &SignedRequest) -> impl Future<Output = HTTPResult<Response>> + Send;
}

/// A service that contacts the Twitter API directly.
#[derive(Debug)]
pub struct TwitterService {
    client: Client,
}

impl HTTPService for TwitterService {}

impl TwitterService {
    /// Creates a new Twitter service whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> HTTPResult<Self> {
        let client = Self::client(timeout)?;
        Ok(Self { client })
    }
}

impl Service for TwitterService {
    async fn send(&self, request: &SignedRequest) -> HTTPResult<Response> {
        debug!("{} {}", request.method(), request.url());

        let resp = self
            .client
            .request(request.method().clone(), request.url().clone())
            .header(header::AUTHORIZATION, request.authorization())
            .send()
            .await
            .map_err(HTTPError::Request)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(HTTPError::Body)?;
        debug!("Received HTTP {status} with {} bytes", body.len());

        Ok(Response::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_a_service() {
        assert!(TwitterService::new(Duration::from_secs(5)).is_ok());
    }
}
