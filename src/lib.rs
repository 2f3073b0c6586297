// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! lasttweet is a command-line tool that prints the most recent tweet from a
//! Twitter account as a single line of JSON, suitable for piping into other
//! tools:
//!
//! ```json
//! {"text":"今日の自撮り #JIDORI","url":"https://twitter.com/JIDORI_OHASHI/status/1234567890123456789"}
//! ```
//!
//! # Examples
//!
//! Print the latest tweet from the default account:
//!
//! ```bash
//! lasttweet
//! ```
//!
//! Print the latest tweet from another account:
//!
//! ```bash
//! lasttweet --account rustlang
//! ```
//!
//! Only the flags shown by `lasttweet --help` and the `init` subcommand are
//! accepted; any other argument is a usage error.
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! lasttweet --help
//! ```
//!
//! # Twitter API Setup
//!
//! Requests to the Twitter API are signed with OAuth 1.0a, so lasttweet
//! needs the four keys of a Twitter application:
//!
//! 1. Create an application in the [Twitter developer portal].
//! 2. Generate its consumer key and secret, and an access token and secret.
//! 3. Run `lasttweet init` and paste each key when prompted. From a
//!    terminal, the two secrets are read without being echoed.
//!
//! The keys are stored one per line, in the order they are asked for, in
//! `~/.TWITTER_CREDENTIALS`. The file is only readable by its owner. Use
//! `--credentials` to keep them somewhere else.
//!
//! # Exit Status
//!
//! lasttweet exits with 0 when a tweet is printed and 1 when something goes
//! wrong. It exits with 255 when there is nothing to print yet, either
//! because the account has no tweets or because the API is rate limiting
//! requests; trying again later may work. Unrecognized arguments exit
//! with 2.
//!
//! # License
//!
//! lasttweet is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [Twitter developer portal]: https://developer.twitter.com/en/portal/dashboard

pub mod cli;
pub mod client;
pub mod clock;
pub mod conf;
pub mod credentials;
pub mod http;
pub mod oauth;
pub mod ratelimit;
pub mod twitter;
pub mod view;

#[cfg(test)]
mod test_utils;
