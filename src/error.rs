//! Error handling for the fetchpool library.
//!
//! Every failure that can happen while a [`Task`](crate::task::Task) runs is
//! represented here. Inside a task these errors never escape: they are
//! rendered once through [`Callbacks::on_error`](crate::callbacks::Callbacks::on_error).
//! The [`Engine`](crate::engine::Engine) only surfaces them from its query
//! methods and from [`EngineBuilder::build`](crate::engine::EngineBuilder::build).

use crate::task::TaskId;

use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Errors that can happen when using fetchpool.
#[derive(Error, Debug)]
pub enum Error {
    /// Connecting to the server, waiting for it, or reading the body failed.
    ///
    /// DNS failures, refused connections and connect/read timeouts all end up
    /// here.
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The server answered with a status the transfer protocol does not
    /// understand (anything but 2xx and 416).
    #[error("Unexpected HTTP status {status}")]
    Protocol { status: StatusCode },

    /// I/O Error.
    ///
    /// Creating the save directory, opening, writing or deleting the
    /// destination file failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A control or query call referenced an id that is not registered.
    #[error("Unknown task {0}")]
    UnknownTask(TaskId),

    /// The URL cannot be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The engine could not set up its worker pool.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Network {
            source: reqwest_middleware::Error::Reqwest(source),
        }
    }
}

/// Result type alias for operations that can fail with a fetchpool error.
pub type Result<T> = std::result::Result<T, Error>;
