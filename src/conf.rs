// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use chrono::TimeDelta;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Account whose timeline is read when no other account is given.
pub const DEFAULT_ACCOUNT: &str = "JIDORI_OHASHI";

/// Name of the credentials file in the user's home directory.
pub const CREDENTIALS_FILENAME: &str = ".TWITTER_CREDENTIALS";

/// Base URL of the Twitter API.
pub const API_BASE: &str = "https://api.twitter.com";

/// Base URL of the public Twitter website, used to build permalinks.
pub const WEB_BASE: &str = "https://twitter.com";

/// Shortest time to wait after being rate limited, in seconds.
pub const DEFAULT_MINIMUM_WAIT_SECS: u32 = 10;

/// How long an HTTP request may take before it is abandoned, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default location of the credentials file, `$HOME/.TWITTER_CREDENTIALS`.
///
/// Returns `None` if the user's home directory cannot be determined.
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIALS_FILENAME))
}

/// Settings for a single run.
///
/// # Examples
///
/// ```
/// use lasttweet::conf::Settings;
/// use chrono::TimeDelta;
///
/// let settings = Settings::build("rustlang", "/tmp/credentials")
///     .minimum_wait(TimeDelta::seconds(30))
///     .build();
/// assert_eq!(settings.account(), "rustlang");
/// assert_eq!(settings.api_base(), "https://api.twitter.com");
/// assert_eq!(settings.minimum_wait(), TimeDelta::seconds(30));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    account: String,
    credentials_path: PathBuf,
    api_base: String,
    web_base: String,
    minimum_wait: TimeDelta,
    timeout: Duration,
}

impl Settings {
    /// Creates settings for reading `account`'s timeline, signing
    /// requests with the credentials stored at `credentials_path`.
    ///
    /// Everything else takes its default value.
    pub fn new(account: impl Into<String>, credentials_path: impl Into<PathBuf>) -> Self {
        Self::build(account, credentials_path).build()
    }

    /// Incrementally builds new settings.
    pub fn build(
        account: impl Into<String>,
        credentials_path: impl Into<PathBuf>,
    ) -> SettingsBuilder {
        SettingsBuilder {
            account: account.into(),
            credentials_path: credentials_path.into(),
            api_base: API_BASE.to_string(),
            web_base: WEB_BASE.to_string(),
            minimum_wait: TimeDelta::seconds(i64::from(DEFAULT_MINIMUM_WAIT_SECS)),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Account whose timeline is read.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Location of the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Base URL of the API.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Base URL used for permalinks.
    pub fn web_base(&self) -> &str {
        &self.web_base
    }

    /// Shortest time to wait after being rate limited.
    pub fn minimum_wait(&self) -> TimeDelta {
        self.minimum_wait
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A builder for settings.
///
/// You probably don't want to use this directly; call [`Settings::build()`]
/// and construct it incrementally instead.
#[derive(Debug)]
#[must_use]
pub struct SettingsBuilder {
    account: String,
    credentials_path: PathBuf,
    api_base: String,
    web_base: String,
    minimum_wait: TimeDelta,
    timeout: Duration,
}

impl SettingsBuilder {
    /// Sets the base URL of the API.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the base URL used for permalinks.
    pub fn web_base(mut self, web_base: impl Into<String>) -> Self {
        self.web_base = web_base.into();
        self
    }

    /// Sets the shortest time to wait after being rate limited.
    pub fn minimum_wait(mut self, minimum_wait: TimeDelta) -> Self {
        self.minimum_wait = minimum_wait;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Finalizes the [`Settings`].
    pub fn build(self) -> Settings {
        Settings {
            account: self.account,
            credentials_path: self.credentials_path,
            api_base: self.api_base,
            web_base: self.web_base,
            minimum_wait: self.minimum_wait,
            timeout: self.timeout,
        }
    }
}
