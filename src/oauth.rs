// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! OAuth 1.0a request signing.
//!
//! Twitter authenticates API calls made on behalf of a user with an
//! [OAuth 1.0a] signature. A [`RequestSigner`] holds a user's
//! [`Credentials`] and turns an endpoint and its query parameters into a
//! [`SignedRequest`]: the full request URL together with the value of its
//! `Authorization` header. Signing never touches the network.
//!
//! [OAuth 1.0a]: https://datatracker.ietf.org/doc/html/rfc5849

use crate::clock::Clock;
use crate::credentials::Credentials;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Method;
use sha1::Sha1;
use thiserror::Error;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

/// A request that is ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: Url,
    authorization: String,
}

impl SignedRequest {
    /// The request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URL, including the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Value of the request's `Authorization` header.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

/// Signs requests to an API with a user's credentials.
#[derive(Debug)]
pub struct RequestSigner<C: Clock> {
    credentials: Credentials,
    api_base: String,
    clock: C,
}

impl<C: Clock> RequestSigner<C> {
    /// Creates a signer for requests to the API at `api_base`.
    ///
    /// `clock` supplies the timestamp that is part of every signature.
    pub fn new(credentials: Credentials, api_base: impl Into<String>, clock: C) -> Self {
        let api_base = api_base.into();
        Self {
            credentials,
            api_base,
            clock,
        }
    }

    /// Signs a GET request to `path` with the given query parameters.
    ///
    /// A fresh nonce is generated for every request.
    pub fn get(&self, path: &str, params: &[(&str, String)]) -> Result<SignedRequest, SigningError> {
        self.sign(Method::GET, path, params, &nonce(), self.clock.timestamp())
    }

    /// Signs a request using the given nonce and timestamp.
    ///
    /// The same inputs always produce the same signed request.
    pub fn sign(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<SignedRequest, SigningError> {
        let mut url = self.endpoint(path)?;

        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.consumer_key()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token()),
            ("oauth_version", VERSION),
        ];

        let base_string = signature_base_string(&method, &url, params, &oauth_params);
        let signature = self.signature(&base_string)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let authorization = format!(
            "OAuth {}",
            oauth_params
                .iter()
                .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
                .collect::<Vec<_>>()
                .join(", ")
        );

        if !params.is_empty() {
            url.set_query(Some(query_string(params).as_str()));
        }

        Ok(SignedRequest {
            method,
            url,
            authorization,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SigningError> {
        let invalid = |source| SigningError::InvalidEndpoint {
            endpoint: format!("{}{}", self.api_base, path),
            source,
        };
        let url = Url::parse(&self.api_base)
            .and_then(|base| base.join(path))
            .map_err(invalid)?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(SigningError::UnexpectedQuery(path.to_string()));
        }
        Ok(url)
    }

    fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            encode(self.credentials.consumer_secret()),
            encode(self.credentials.access_token_secret()),
        )
    }

    fn signature(&self, base_string: &str) -> Result<String, SigningError> {
        let mut mac = HmacSha1::new_from_slice(self.signing_key().as_bytes())
            .map_err(|_| SigningError::Key)?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Percent-encodes everything except the RFC 3986 unreserved characters.
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the string that is signed, as described in [RFC 5849 §3.4.1].
///
/// [RFC 5849 §3.4.1]: https://datatracker.ietf.org/doc/html/rfc5849#section-3.4.1
fn signature_base_string(
    method: &Method,
    url: &Url,
    params: &[(&str, String)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (encode(key), encode(value)))
        .chain(
            oauth_params
                .iter()
                .map(|(key, value)| (encode(key), encode(value))),
        )
        .collect();
    pairs.sort();

    let normalized = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(url.as_str()),
        encode(&normalized)
    )
}

/// An error building a signed request.
///
/// These indicate a programming error rather than a problem at runtime.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The endpoint is not a valid URL.
    #[error("Invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The endpoint path carries its own query string or fragment.
    #[error("Endpoint {0} must not include a query string")]
    UnexpectedQuery(String),

    /// The signing key was rejected.
    #[error("Invalid signing key")]
    Key,
}
