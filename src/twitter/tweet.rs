// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Tweets and errors as they appear in Twitter API responses.

use serde::Deserialize;
use std::num::ParseIntError;

/// API error code for "Rate limit exceeded".
pub const RATE_LIMIT_EXCEEDED: u32 = 88;

/// A tweet as returned by the Twitter API.
///
/// Only the fields needed for display are kept.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RawPost {
    #[serde(rename = "id_str")]
    id: String,
    text: String,
}

impl RawPost {
    /// Creates a new tweet.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Parses a JSON array of tweets.
    pub fn parse_timeline(body: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(body)
    }

    /// The tweet's ID, as a decimal string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tweet's ID as a number.
    pub fn numeric_id(&self) -> Result<u64, ParseIntError> {
        self.id.parse()
    }

    /// The tweet's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the tweet, returning its ID and text.
    pub fn into_parts(self) -> (String, String) {
        (self.id, self.text)
    }
}

/// The body of an unsuccessful Twitter API response.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    code: u32,
    message: String,
}

impl ApiErrors {
    /// Parses an error body, returning no errors if it is not in
    /// Twitter's usual error format.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// True if any of the errors has the given error `code`.
    pub fn has_code(&self, code: u32) -> bool {
        self.errors.iter().any(|err| err.code == code)
    }

    /// Message of the first error, if there is one.
    pub fn message(&self) -> Option<&str> {
        self.errors.first().map(|err| err.message.as_str())
    }
}
