// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Client for reading the latest tweet from a Twitter account.

use crate::clock::{Clock, DateTime, SystemClock, TimeDelta, Utc};
use crate::conf::Settings;
use crate::credentials::{CredentialStore, FileError};
use crate::http::HTTPError;
use crate::oauth::RequestSigner;
use crate::ratelimit::backoff_for;
use crate::twitter::{FetchError, Service, TimelineFetcher, TimelineQuery, TwitterService};
use crate::view::{ViewPost, project_onto};
use log::info;
use std::fmt;
use thiserror::Error;

/// How a fetch ended, short of failing outright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The newest tweet on the requested page.
    Posted(ViewPost),

    /// There are no tweets at or before the requested cursor.
    EndOfData,

    /// The API is rate limiting requests.
    ///
    /// No retry is attempted; `wait` is how long the caller should wait
    /// before trying again.
    RateLimited {
        reset_at: DateTime<Utc>,
        wait: TimeDelta,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Posted(view) => write!(f, "{}", view.url()),
            Outcome::EndOfData => write!(f, "No more results, end of timeline."),
            Outcome::RateLimited { reset_at, wait } => write!(
                f,
                "Rate limited. Reset at {reset_at}. Waiting for {}s",
                wait.num_seconds()
            ),
        }
    }
}

/// Reads tweets from a single account's timeline.
#[derive(Debug)]
pub struct Client<S: Service, C: Clock> {
    settings: Settings,
    fetcher: TimelineFetcher<S>,
    clock: C,
}

impl Client<TwitterService, SystemClock> {
    /// Creates a new client that talks to the Twitter API.
    ///
    /// Returns an [`enum@Error`] if the HTTP client cannot be created.
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let service = TwitterService::new(settings.timeout())?;
        Ok(Self::with_service(settings, service, SystemClock))
    }
}

impl<S: Service, C: Clock> Client<S, C> {
    /// Creates a new client.
    ///
    /// `service` is the actual service implementation used to send requests,
    /// and `clock` is used to timestamp requests and to decide how long to
    /// back off when rate limited.
    pub fn with_service(settings: Settings, service: S, clock: C) -> Self {
        let fetcher = TimelineFetcher::new(service);
        Self {
            settings,
            fetcher,
            clock,
        }
    }

    /// The client's settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetches the account's most recent tweet.
    pub async fn latest(&self) -> Result<Outcome, Error> {
        let query = TimelineQuery::latest(self.settings.account());
        self.fetch(&query).await
    }

    /// Fetches the newest tweet on the page of the timeline described by
    /// `query`.
    ///
    /// Credentials are read from disk on every call.
    pub async fn fetch(&self, query: &TimelineQuery) -> Result<Outcome, Error> {
        let credentials = CredentialStore::new(self.settings.credentials_path()).load()?;
        let signer = RequestSigner::new(credentials, self.settings.api_base(), &self.clock);

        let outcome = match self.fetcher.fetch(&signer, query).await {
            // Twitter returns timelines newest first.
            Ok(posts) => match posts.into_iter().next() {
                Some(post) => Outcome::Posted(project_onto(
                    self.settings.web_base(),
                    post,
                    query.screen_name(),
                )),
                None => Outcome::EndOfData,
            },
            Err(FetchError::RateLimited(info)) => Outcome::RateLimited {
                reset_at: info.reset_at(),
                wait: backoff_for(&info, self.clock.now(), self.settings.minimum_wait()),
            },
            Err(err) => return Err(err.into()),
        };

        info!("Fetched {}'s timeline: {outcome}", query.screen_name());
        Ok(outcome)
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// The credentials file could not be used.
    #[error("{0}")]
    Credentials(#[from] FileError),

    /// The HTTP client could not be created.
    #[error("Service error: {0}")]
    Http(#[from] HTTPError),

    /// The timeline could not be fetched.
    #[error("{0}")]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FrozenClock, TestService, credentials_file};
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use std::num::NonZeroU32;
    use std::path::Path;

    fn client(path: &Path, service: TestService) -> Client<TestService, FrozenClock> {
        let settings = Settings::new("JIDORI_OHASHI", path);
        Client::with_service(settings, service, FrozenClock::default())
    }

    #[tokio::test]
    async fn it_returns_the_latest_tweet() {
        let (_dir, path) = credentials_file();
        let outcome = client(&path, TestService::ok("timeline_latest"))
            .latest()
            .await
            .unwrap();
        let view = match outcome {
            Outcome::Posted(view) => view,
            other => panic!("expected a tweet, got {other:?}"),
        };
        assert_eq!(view.text(), "今日の自撮り #JIDORI https://t.co/abc123");
        assert_eq!(
            view.url(),
            "https://twitter.com/JIDORI_OHASHI/status/1234567890123456789"
        );
    }

    #[tokio::test]
    async fn it_returns_the_first_tweet_of_a_page() {
        let (_dir, path) = credentials_file();
        let query = TimelineQuery::page("JIDORI_OHASHI", NonZeroU32::new(2).unwrap(), 0);
        let outcome = client(&path, TestService::ok("timeline_page"))
            .fetch(&query)
            .await
            .unwrap();
        let view = match outcome {
            Outcome::Posted(view) => view,
            other => panic!("expected a tweet, got {other:?}"),
        };
        assert!(view.url().ends_with("/status/1234567890123456789"));
    }

    #[tokio::test]
    async fn it_links_to_the_configured_site() {
        let (_dir, path) = credentials_file();
        let settings = Settings::build("JIDORI_OHASHI", &path)
            .web_base("https://x.com")
            .build();
        let client = Client::with_service(
            settings,
            TestService::ok("timeline_latest"),
            FrozenClock::default(),
        );
        let outcome = client.latest().await.unwrap();
        let view = match outcome {
            Outcome::Posted(view) => view,
            other => panic!("expected a tweet, got {other:?}"),
        };
        assert_eq!(
            view.url(),
            "https://x.com/JIDORI_OHASHI/status/1234567890123456789"
        );
    }

    #[tokio::test]
    async fn it_signals_the_end_of_the_timeline() {
        let (_dir, path) = credentials_file();
        let outcome = client(&path, TestService::ok("timeline_empty"))
            .latest()
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::EndOfData);
    }

    #[tokio::test]
    async fn it_waits_the_minimum_when_rate_limited_briefly() {
        let (_dir, path) = credentials_file();
        let reset_at = FrozenClock::default().timestamp() + 2;
        let outcome = client(&path, TestService::rate_limited(reset_at))
            .latest()
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::RateLimited {
                reset_at: DateTime::from_timestamp(reset_at, 0).unwrap(),
                wait: TimeDelta::seconds(10),
            }
        );
    }

    #[tokio::test]
    async fn it_waits_past_the_reset_when_rate_limited() {
        let (_dir, path) = credentials_file();
        let reset_at = FrozenClock::default().timestamp() + 20;
        let outcome = client(&path, TestService::rate_limited(reset_at))
            .latest()
            .await
            .unwrap();
        let wait = match outcome {
            Outcome::RateLimited { wait, .. } => wait,
            other => panic!("expected rate limiting, got {other:?}"),
        };
        assert_eq!(wait, TimeDelta::seconds(21));
    }

    #[tokio::test]
    async fn it_honors_the_configured_minimum_wait() {
        let (_dir, path) = credentials_file();
        let settings = Settings::build("JIDORI_OHASHI", &path)
            .minimum_wait(TimeDelta::seconds(60))
            .build();
        let reset_at = FrozenClock::default().timestamp() + 20;
        let client = Client::with_service(
            settings,
            TestService::rate_limited(reset_at),
            FrozenClock::default(),
        );
        let Outcome::RateLimited { wait, .. } = client.latest().await.unwrap() else {
            panic!("expected rate limiting");
        };
        assert_eq!(wait, TimeDelta::seconds(60));
    }

    #[tokio::test]
    async fn it_fails_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let service = TestService::ok("timeline_latest");
        let client = client(&dir.path().join("missing"), service);
        let err = client.latest().await.unwrap_err();
        assert!(
            matches!(err, Error::Credentials(FileError::NotFound(_))),
            "{err:?}"
        );
        assert!(client.fetcher.service().last_request().is_none());
    }

    #[tokio::test]
    async fn it_fails_on_api_errors() {
        let (_dir, path) = credentials_file();
        let service = TestService::new(StatusCode::NOT_FOUND, "");
        let err = client(&path, service).latest().await.unwrap_err();
        assert!(
            matches!(err, Error::Fetch(FetchError::Api { status: 404, .. })),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn it_fails_when_the_api_cannot_be_reached() {
        let (_dir, path) = credentials_file();
        let settings = Settings::build("JIDORI_OHASHI", &path)
            .api_base("http://127.0.0.1:9")
            .build();
        let client = Client::new(settings).unwrap();
        let err = client.latest().await.unwrap_err();
        assert!(
            matches!(err, Error::Fetch(FetchError::Transport(_))),
            "{err:?}"
        );
    }

    #[test]
    fn it_describes_rate_limiting() {
        let outcome = Outcome::RateLimited {
            reset_at: FrozenClock::default().now(),
            wait: TimeDelta::seconds(21),
        };
        assert_eq!(
            outcome.to_string(),
            "Rate limited. Reset at 2025-05-23 17:13:00 UTC. Waiting for 21s"
        );
    }

    #[test]
    fn it_describes_the_end_of_the_timeline() {
        assert_eq!(
            Outcome::EndOfData.to_string(),
            "No more results, end of timeline."
        );
    }
}
