// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Twitter API services and timelines for communicating with Twitter over HTTP.

pub mod service;
pub mod timeline;
pub mod tweet;

pub use service::{Service, TwitterService};
pub use timeline::{FetchError, TimelineFetcher, TimelineQuery};
pub use tweet::RawPost;
