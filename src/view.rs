// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Minimal views of tweets for output.

use crate::conf::WEB_BASE;
use crate::twitter::RawPost;
use serde::Serialize;

/// The parts of a tweet that are printed: its text and a link to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewPost {
    text: String,
    url: String,
}

impl ViewPost {
    /// The tweet's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Permalink to the tweet.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The view as a single-line JSON object, `{"text": ..., "url": ...}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Projects a tweet by `account` onto its view, linking to twitter.com.
///
/// # Examples
///
/// ```
/// use lasttweet::twitter::RawPost;
/// use lasttweet::view::project;
///
/// let view = project(RawPost::new("123", "hello"), "JIDORI_OHASHI");
/// assert_eq!(view.text(), "hello");
/// assert_eq!(view.url(), "https://twitter.com/JIDORI_OHASHI/status/123");
/// ```
pub fn project(post: RawPost, account: &str) -> ViewPost {
    project_onto(WEB_BASE, post, account)
}

/// Projects a tweet by `account` onto its view, linking to the site at
/// `web_base`.
pub fn project_onto(web_base: &str, post: RawPost, account: &str) -> ViewPost {
    let (id, text) = post.into_parts();
    let url = format!("{}/{account}/status/{id}", web_base.trim_end_matches('/'));
    ViewPost { text, url }
}
