//! Blocking HTTP client wrapper with pluggable body codecs.
//!
//! # Overview
//! `Client` wraps a `ureq` agent configured once from `Config`, and exposes
//! one method per HTTP verb. Each call runs the same phases: apply caller
//! headers, encode the input, send, classify the status, decode the output.
//! Exactly one of `Error::Encode`, `Error::Send`, the error handler's result,
//! or `Error::Decode` is returned when a phase fails.
//!
//! # Design
//! - Only 200..=299 counts as success. Anything else, 304 included, goes to
//!   the error handler and the decoder is not called.
//! - Encoder and decoder are type parameters defaulting to JSON; the error
//!   handler is a shared closure.
//! - No retries, no per-call timeouts. Pooling and TLS belong to `ureq`.
//!
//! ```no_run
//! use serde::Deserialize;
//! use verb_client::Client;
//!
//! #[derive(Deserialize)]
//! struct Health {
//!     status: String,
//! }
//!
//! let client = Client::new();
//! let mut health = Health { status: String::new() };
//! client.get("https://example.com/health", Some(&mut health), None)?;
//! # Ok::<(), verb_client::Error>(())
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;

pub use client::Client;
pub use codec::{JsonDecoder, JsonEncoder, RequestEncoder, ResponseDecoder};
pub use config::{Config, DEFAULT_MAX_RESPONSE_BODY_SIZE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::{default_error_handler, BoxError, Error, ErrorHandler, Result};
pub use http::{Header, Method, Request, Response};
