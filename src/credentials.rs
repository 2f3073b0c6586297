// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Twitter API credentials and the file they are kept in.
//!
//! Requests to the Twitter API are signed with four tokens: an application's
//! consumer key and secret, and a user's access token and secret. They are
//! stored one per line, in that order, in a file readable only by its owner:
//!
//! ```text
//! consumer key
//! consumer secret
//! access token
//! access token secret
//! ```

use log::debug;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

const FIELDS: [&str; 4] = [
    "consumer key",
    "consumer secret",
    "access token",
    "access token secret",
];

const SECRET_FIELDS: [&str; 2] = ["consumer secret", "access token secret"];

/// The four tokens used to sign Twitter API requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    ///
    /// Returns an error if any token is empty or contains a line break,
    /// since neither could be written to and read back from a credentials
    /// file.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Result<Self, InvalidCredentials> {
        let credentials = Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        };

        for (field, value) in FIELDS.into_iter().zip(credentials.fields()) {
            if value.is_empty() {
                return Err(InvalidCredentials::Empty(field));
            }
            if value.contains(['\n', '\r']) {
                return Err(InvalidCredentials::LineBreak(field));
            }
        }

        Ok(credentials)
    }

    /// Parses the contents of a credentials file.
    fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        match lines.as_slice() {
            [consumer_key, consumer_secret, access_token, access_token_secret, ..] => {
                Self::new(
                    *consumer_key,
                    *consumer_secret,
                    *access_token,
                    *access_token_secret,
                )
                .map_err(|err| err.to_string())
            }
            _ => Err(format!("expected 4 lines, found {}", lines.len())),
        }
    }

    /// The application's consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The application's consumer secret.
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// The user's access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The user's access token secret.
    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }

    fn fields(&self) -> [&str; 4] {
        [
            &self.consumer_key,
            &self.consumer_secret,
            &self.access_token,
            &self.access_token_secret,
        ]
    }

    fn to_file_contents(&self) -> String {
        self.fields().join("\n")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Reads and writes [`Credentials`] in a file on disk.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not have to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { path }
    }

    /// Location of the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads credentials from the file.
    pub fn load(&self) -> Result<Credentials, FileError> {
        let text = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FileError::NotFound(self.path.clone())
            } else {
                FileError::Unreadable {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let credentials = Credentials::parse(&text).map_err(|reason| FileError::Malformed {
            path: self.path.clone(),
            reason,
        })?;
        debug!("Loaded credentials from {}", self.path.display());
        Ok(credentials)
    }

    /// Writes credentials to the file, replacing anything already there.
    ///
    /// On Unix the file is created with mode 0600, and an existing file
    /// has its permissions narrowed to 0600 as well.
    pub fn save(&self, credentials: &Credentials) -> Result<(), FileError> {
        let unwritable = |source| FileError::Unwritable {
            path: self.path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).map_err(unwritable)?;

        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(unwritable)?;

        file.write_all(credentials.to_file_contents().as_bytes())
            .map_err(unwritable)?;
        file.sync_all().map_err(unwritable)?;

        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// Interactively asks for the four tokens, one per line.
///
/// A prompt for each token is written to `output` and the answer is read
/// from `input` with surrounding whitespace removed.
pub fn prompt_credentials<R, W>(input: R, output: W) -> Result<Credentials, SetupError>
where
    R: BufRead,
    W: Write,
{
    prompt(input, output, None::<fn(&str) -> io::Result<String>>)
}

/// Like [`prompt_credentials`], but reads the consumer secret and the
/// access token secret with `read_secret` instead of from `input`.
///
/// `read_secret` is given the prompt to show and is expected to read the
/// answer without echoing it, as `rpassword::prompt_password` does.
pub fn prompt_credentials_hiding_secrets<R, W, S>(
    input: R,
    output: W,
    read_secret: S,
) -> Result<Credentials, SetupError>
where
    R: BufRead,
    W: Write,
    S: FnMut(&str) -> io::Result<String>,
{
    prompt(input, output, Some(read_secret))
}

fn prompt<R, W, S>(
    mut input: R,
    mut output: W,
    mut read_secret: Option<S>,
) -> Result<Credentials, SetupError>
where
    R: BufRead,
    W: Write,
    S: FnMut(&str) -> io::Result<String>,
{
    let mut answers: [String; 4] = Default::default();
    for (answer, field) in answers.iter_mut().zip(FIELDS) {
        let prompt = format!("Enter your Twitter application {field}: ");
        let read = match read_secret.as_mut() {
            Some(read_secret) if SECRET_FIELDS.contains(&field) => read_secret(&prompt)?,
            _ => {
                write!(output, "{prompt}")?;
                output.flush()?;
                let mut line = String::new();
                input.read_line(&mut line)?;
                line
            }
        };
        *answer = read.trim().to_string();
    }

    let [consumer_key, consumer_secret, access_token, access_token_secret] = answers;
    let credentials = Credentials::new(
        consumer_key,
        consumer_secret,
        access_token,
        access_token_secret,
    )?;
    Ok(credentials)
}

/// Why a set of tokens cannot be used as [`Credentials`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCredentials {
    /// A token is empty.
    #[error("{0} is empty")]
    Empty(&'static str),

    /// A token spans more than one line.
    #[error("{0} contains a line break")]
    LineBreak(&'static str),
}

/// An error reading or writing the credentials file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The credentials file does not exist.
    #[error("Credentials file {} not found; run `init` to create it", .0.display())]
    NotFound(PathBuf),

    /// The credentials file exists but could not be read.
    #[error("Could not read credentials file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The credentials file does not hold four usable tokens.
    #[error("Could not parse credentials file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The credentials file could not be written.
    #[error("Could not write credentials file {}: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An error while interactively setting up credentials.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Reading an answer or writing a prompt failed.
    #[error("Could not read credentials: {0}")]
    Io(#[from] io::Error),

    /// The answers do not form valid credentials.
    #[error("Invalid credentials: {0}")]
    Invalid(#[from] InvalidCredentials),
}
