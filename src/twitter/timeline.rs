// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reading a user's timeline.

use crate::clock::Clock;
use crate::http::{HTTPError, Response};
use crate::oauth::{RequestSigner, SigningError};
use crate::ratelimit::RateLimitInfo;
use crate::twitter::service::Service;
use crate::twitter::tweet::{ApiErrors, RATE_LIMIT_EXCEEDED, RawPost};
use log::{debug, warn};
use reqwest::StatusCode;
use std::num::NonZeroU32;
use thiserror::Error;

/// Path of the user timeline endpoint.
pub const USER_TIMELINE: &str = "/1.1/statuses/user_timeline.json";

const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";
const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";

/// A request for a page of a user's timeline.
///
/// Timelines are paged backwards with a cursor: the ID of the newest tweet
/// that may be returned. Without a cursor the page starts at the user's
/// most recent tweet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineQuery {
    count: NonZeroU32,
    screen_name: String,
    max_id: Option<u64>,
}

impl TimelineQuery {
    /// A query for the single most recent tweet by `screen_name`.
    pub fn latest(screen_name: impl Into<String>) -> Self {
        Self {
            count: NonZeroU32::MIN,
            screen_name: screen_name.into(),
            max_id: None,
        }
    }

    /// A query for up to `count` of `screen_name`'s tweets with IDs no
    /// greater than `max_id`.
    ///
    /// A `max_id` of 0 means there is no cursor, and the page starts at
    /// the most recent tweet.
    pub fn page(screen_name: impl Into<String>, count: NonZeroU32, max_id: u64) -> Self {
        Self {
            count,
            screen_name: screen_name.into(),
            max_id: (max_id != 0).then_some(max_id),
        }
    }

    /// Maximum number of tweets to return.
    pub fn count(&self) -> NonZeroU32 {
        self.count
    }

    /// The user whose timeline is read.
    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    /// The pagination cursor, if there is one.
    pub fn max_id(&self) -> Option<u64> {
        self.max_id
    }

    /// The query's parameters, in the order they appear in the URL.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("count", self.count.to_string()),
            ("screen_name", self.screen_name.clone()),
        ];
        if let Some(max_id) = self.max_id {
            params.push(("max_id", max_id.to_string()));
        }
        params
    }
}

/// Fetches pages of a user's timeline.
#[derive(Debug)]
pub struct TimelineFetcher<S: Service> {
    service: S,
}

impl<S: Service> TimelineFetcher<S> {
    /// Creates a fetcher that sends its requests through `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The service requests are sent through.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetches the page of the timeline described by `query`.
    ///
    /// Tweets are returned newest first. An empty page means there are no
    /// tweets at or before the query's cursor; it is not an error.
    pub async fn fetch<C: Clock>(
        &self,
        signer: &RequestSigner<C>,
        query: &TimelineQuery,
    ) -> Result<Vec<RawPost>, FetchError> {
        let request = signer.get(USER_TIMELINE, &query.params())?;
        let response = self.service.send(&request).await?;
        parse_response(&response, query)
    }
}

/// Turns a timeline response into tweets, or the reason there are none.
fn parse_response(response: &Response, query: &TimelineQuery) -> Result<Vec<RawPost>, FetchError> {
    if let Some(remaining) = response.header_i64(RATE_LIMIT_REMAINING) {
        debug!("{remaining} calls available");
    }

    let status = response.status();
    if !status.is_success() {
        return Err(api_error(response));
    }

    let posts = RawPost::parse_timeline(response.body())?;
    for post in &posts {
        let id = post
            .numeric_id()
            .map_err(|_| FetchError::InvalidPost(format!("tweet ID {:?} is not a number", post.id())))?;
        if let Some(max_id) = query.max_id() {
            if id > max_id {
                return Err(FetchError::InvalidPost(format!(
                    "tweet {id} is newer than the requested maximum of {max_id}"
                )));
            }
        }
    }
    debug!("Fetched {} tweets for {}", posts.len(), query.screen_name());
    Ok(posts)
}

fn api_error(response: &Response) -> FetchError {
    let status = response.status();
    let errors = ApiErrors::parse(response.body());

    if status == StatusCode::TOO_MANY_REQUESTS || errors.has_code(RATE_LIMIT_EXCEEDED) {
        let reset = response
            .header_i64(RATE_LIMIT_RESET)
            .and_then(RateLimitInfo::from_timestamp);
        match reset {
            Some(info) => {
                warn!("Rate limited; {info}");
                return FetchError::RateLimited(info);
            }
            None => warn!("Rate limited, but the response has no usable reset time"),
        }
    }

    let message = errors
        .message()
        .map(String::from)
        .unwrap_or_else(|| response.body().trim().to_string());
    FetchError::Api {
        status: status.as_u16(),
        message,
    }
}

/// An error fetching a timeline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be signed.
    #[error("Could not sign request: {0}")]
    Signing(#[from] SigningError),

    /// The request could not be sent, or the response could not be read.
    #[error("Could not send request: {0}")]
    Transport(#[from] HTTPError),

    /// The response body is not a timeline.
    #[error("Problem parsing response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API rejected the request.
    #[error("Request returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The timeline contains a tweet that cannot be used.
    #[error("Invalid tweet in response: {0}")]
    InvalidPost(String),

    /// Too many requests have been made; they may resume after the
    /// limit resets.
    #[error("Rate limited; {0}")]
    RateLimited(RateLimitInfo),
}
