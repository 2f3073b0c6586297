// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::client::{Client, Outcome};
use crate::conf::{self, DEFAULT_ACCOUNT, Settings};
use crate::credentials::{self, CredentialStore};
use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// How a run of the program ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// A tweet was printed, or credentials were saved.
    Success,

    /// There was nothing to print: the timeline is empty, or requests are
    /// being rate limited. Trying again later may succeed.
    SoftStop,

    /// Something went wrong.
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::SoftStop => ExitCode::from(255),
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

impl From<&Outcome> for Exit {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Posted(_) => Exit::Success,
            Outcome::EndOfData | Outcome::RateLimited { .. } => Exit::SoftStop,
        }
    }
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Prints the most recent tweet from a Twitter account as JSON", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Twitter account to read
    #[arg(long, default_value = DEFAULT_ACCOUNT)]
    account: String,

    /// Credentials file [default: ~/.TWITTER_CREDENTIALS]
    #[arg(long, value_name = "FILE")]
    credentials: Option<PathBuf>,

    /// Never suggest waiting less than this long after being rate limited
    #[arg(long, value_name = "SECONDS", default_value_t = conf::DEFAULT_MINIMUM_WAIT_SECS)]
    min_wait: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Settings for this run.
    ///
    /// Returns `None` if no credentials file was given and the user's
    /// home directory cannot be found.
    pub fn settings(&self) -> Option<Settings> {
        let credentials_path = self
            .credentials
            .clone()
            .or_else(conf::default_credentials_path)?;
        let settings = Settings::build(&self.account, credentials_path)
            .minimum_wait(TimeDelta::seconds(i64::from(self.min_wait)))
            .build();
        Some(settings)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactively store Twitter API credentials
    Init,
}

/// Runs the command-line program.
pub async fn run(config: Config) -> ExitCode {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    let Some(settings) = config.settings() else {
        eprintln!("Could not find your home directory; use --credentials to locate the credentials file");
        return Exit::Failure.into();
    };
    debug!("{settings:?}");

    let exit = match config.command {
        Some(Command::Init) => run_init(&settings),
        None => run_fetch(settings).await,
    };
    exit.into()
}

fn run_init(settings: &Settings) -> Exit {
    let stdin = io::stdin().lock();
    let prompted = if atty::is(atty::Stream::Stdin) {
        credentials::prompt_credentials_hiding_secrets(stdin, io::stderr(), |prompt: &str| {
            rpassword::prompt_password(prompt)
        })
    } else {
        credentials::prompt_credentials(stdin, io::stderr())
    };
    let credentials = match prompted {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{err}");
            return Exit::Failure;
        }
    };

    let store = CredentialStore::new(settings.credentials_path());
    match store.save(&credentials) {
        Ok(()) => {
            eprintln!("Saved credentials to {}", store.path().display());
            Exit::Success
        }
        Err(err) => {
            eprintln!("{err}");
            Exit::Failure
        }
    }
}

async fn run_fetch(settings: Settings) -> Exit {
    let client = match Client::new(settings) {
        Ok(client) => client,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("{err}");
            return Exit::Failure;
        }
    };

    match client.latest().await {
        Ok(Outcome::Posted(view)) => match view.to_json() {
            Ok(json) => {
                println!("{json}");
                Exit::Success
            }
            Err(err) => {
                eprintln!("Could not encode tweet: {err}");
                Exit::Failure
            }
        },
        Ok(outcome) => {
            eprintln!("{outcome}");
            Exit::from(&outcome)
        }
        Err(err) => {
            debug!("{err:?}");
            eprintln!("{err}");
            Exit::Failure
        }
    }
}
