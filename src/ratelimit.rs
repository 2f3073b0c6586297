// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Decides how long to back off after being rate limited.

use crate::clock::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Rate limit metadata returned with a rejected request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitInfo {
    reset_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Creates rate limit metadata for a limit that resets at `reset_at`.
    pub fn new(reset_at: DateTime<Utc>) -> Self {
        Self { reset_at }
    }

    /// Creates rate limit metadata from a reset time expressed in seconds
    /// since the Unix epoch, which is how Twitter reports it.
    ///
    /// Returns `None` if the timestamp is out of range.
    pub fn from_timestamp(reset_at: i64) -> Option<Self> {
        DateTime::from_timestamp(reset_at, 0).map(Self::new)
    }

    /// When requests may resume.
    pub fn reset_at(&self) -> DateTime<Utc> {
        self.reset_at
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate limit resets at {}", self.reset_at)
    }
}

/// How long to wait before trying again.
///
/// This is one second past the reset time, to allow for clock skew, but
/// never less than `minimum_wait`, even if the reset time has already
/// passed.
///
/// # Examples
///
/// ```
/// use lasttweet::clock::{TimeDelta, Utc};
/// use lasttweet::ratelimit::{RateLimitInfo, backoff_for};
///
/// let now = Utc::now();
/// let info = RateLimitInfo::new(now + TimeDelta::seconds(20));
/// assert_eq!(backoff_for(&info, now, TimeDelta::seconds(10)), TimeDelta::seconds(21));
/// ```
pub fn backoff_for(info: &RateLimitInfo, now: DateTime<Utc>, minimum_wait: TimeDelta) -> TimeDelta {
    let until_reset = info.reset_at - now + TimeDelta::seconds(1);
    until_reset.max(minimum_wait)
}
