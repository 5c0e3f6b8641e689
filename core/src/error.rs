//! Error types for the client.
//!
//! # Design
//! One variant per phase of a call, so callers can tell where it failed
//! without parsing messages. `Status` is what the default error handler
//! produces; custom handlers may return any variant, usually `Handler`.

use std::io;
use std::sync::Arc;

use crate::http::Response;

/// Boxed error returned by encoders, decoders and custom error handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Maps a non-2xx response to the error returned from the call.
pub type ErrorHandler = Arc<dyn Fn(&Response) -> Error + Send + Sync>;

/// Errors returned by `Client` verb methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input value could not be encoded. Nothing was sent.
    #[error("encode request failed: {0}")]
    Encode(#[source] BoxError),

    /// The exchange with the server failed, including timeouts and invalid
    /// URIs or headers rejected by the transport.
    #[error("send request failed: {0}")]
    Send(#[source] ureq::Error),

    /// The server answered with a status outside 200..=299.
    #[error("unexpected status code {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx body could not be decoded into the requested type.
    #[error("decode response failed: {0}")]
    Decode(#[source] BoxError),

    /// Produced by a custom error handler.
    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// Status code carried by a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the send phase failed because a read or write timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Send(ureq::Error::Timeout(_)) => true,
            Error::Send(ureq::Error::Io(e)) => {
                matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            }
            _ => false,
        }
    }
}

/// Default error handler: keeps the status code and the raw body.
pub fn default_error_handler(response: &Response) -> Error {
    Error::Status {
        status: response.status,
        body: response.text(),
    }
}
