//! Error type definitions for the stream curator
//!
//! Source and probe failures never abort a run: the orchestrator logs a
//! `SourceError` and moves on, and turns a `ProbeError` into a rejection.
//! Only `AppError` values that escape the orchestrator end the process.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (unparseable config, invalid thresholds)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A required input file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output artifacts could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to obtain a source playlist document
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network connection timeouts
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Connection or transfer failures
    #[error("Fetch failed: {url} - {message}")]
    Fetch { url: String, message: String },

    /// Non-success HTTP status from the source server
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Local playlist file could not be read
    #[error("Read failed: {} - {message}", .path.display())]
    Read { path: PathBuf, message: String },
}

/// Failure while probing a single candidate stream
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe did not finish within its budget
    #[error("{probe} timed out after {after:?}")]
    Timeout { probe: &'static str, after: Duration },

    /// The media inspector could not be started
    #[error("failed to execute {command}: {message}")]
    Spawn { command: String, message: String },

    /// The media inspector produced output we could not interpret
    #[error("malformed probe output '{output}'")]
    MalformedOutput { output: String },

    /// Non-success HTTP status from the stream server
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// Connection or body read failures
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure on a required input file
    pub fn input_file<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::InputFile {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O failure on an output artifact
    pub fn output_file<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::OutputFile {
            path: path.into(),
            source,
        }
    }
}

impl SourceError {
    /// Create a timeout error
    pub fn timeout<U: Into<String>>(url: U) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create a fetch error
    pub fn fetch<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest failure for a source URL
    pub fn from_reqwest<U: Into<String>>(url: U, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(url)
        } else {
            Self::fetch(url, error.to_string())
        }
    }
}

impl ProbeError {
    /// Create a timeout error for the named probe
    pub fn timeout(probe: &'static str, after: Duration) -> Self {
        Self::Timeout { probe, after }
    }

    /// Create a malformed output error
    pub fn malformed<S: Into<String>>(output: S) -> Self {
        Self::MalformedOutput {
            output: output.into(),
        }
    }
}
