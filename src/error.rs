use std::io;

use thiserror::Error;

/// Errors raised while building or driving an observer.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameters. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configuration file exists but could not be parsed.
    #[error("invalid config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A call-time argument the caller should not have passed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The line did not yield a usable key.
    #[error("line holds nothing of interest")]
    NoInterest,

    /// Reading from the source failed.
    #[error("stream error: {0}")]
    Stream(#[from] io::Error),
}

impl Error {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
