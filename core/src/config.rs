//! Client configuration and its defaults.
//!
//! # Design
//! `Config` is plain data. Zero values (empty name, zero durations, zero body
//! limit, no error handler) mean "use the default" and are replaced by
//! `Config::effective` when a client is built. Encoder and decoder are type
//! parameters, so they always have a value; JSON is selected by `Default`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::codec::{JsonDecoder, JsonEncoder};
use crate::error::{default_error_handler, ErrorHandler};

pub const DEFAULT_USER_AGENT: &str = concat!("verb-client/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RESPONSE_BODY_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct Config<E = JsonEncoder, D = JsonDecoder> {
    /// Sent as the User-Agent header.
    pub name: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Omit the User-Agent header unless a call sets one.
    pub no_default_user_agent_header: bool,
    /// Largest response body read into memory, in bytes.
    pub max_response_body_size: u64,
    pub request_encoder: E,
    pub response_decoder: D,
    pub error_handler: Option<ErrorHandler>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            read_timeout: Duration::ZERO,
            write_timeout: Duration::ZERO,
            no_default_user_agent_header: false,
            max_response_body_size: 0,
            request_encoder: JsonEncoder,
            response_decoder: JsonDecoder,
            error_handler: None,
        }
    }
}

impl<E, D> Config<E, D> {
    /// Replace the request encoder.
    pub fn request_encoder<E2>(self, encoder: E2) -> Config<E2, D> {
        Config {
            name: self.name,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            no_default_user_agent_header: self.no_default_user_agent_header,
            max_response_body_size: self.max_response_body_size,
            request_encoder: encoder,
            response_decoder: self.response_decoder,
            error_handler: self.error_handler,
        }
    }

    /// Replace the response decoder.
    pub fn response_decoder<D2>(self, decoder: D2) -> Config<E, D2> {
        Config {
            name: self.name,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            no_default_user_agent_header: self.no_default_user_agent_header,
            max_response_body_size: self.max_response_body_size,
            request_encoder: self.request_encoder,
            response_decoder: decoder,
            error_handler: self.error_handler,
        }
    }

    /// Install an error handler for non-2xx responses.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&crate::http::Response) -> crate::error::Error + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Fill every zero-valued field with its default.
    pub fn effective(mut self) -> Self {
        if self.name.is_empty() {
            self.name = DEFAULT_USER_AGENT.to_string();
        }
        if self.read_timeout.is_zero() {
            self.read_timeout = DEFAULT_TIMEOUT;
        }
        if self.write_timeout.is_zero() {
            self.write_timeout = DEFAULT_TIMEOUT;
        }
        if self.max_response_body_size == 0 {
            self.max_response_body_size = DEFAULT_MAX_RESPONSE_BODY_SIZE;
        }
        if self.error_handler.is_none() {
            self.error_handler = Some(Arc::new(default_error_handler));
        }
        self
    }
}

impl<E: fmt::Debug, D: fmt::Debug> fmt::Debug for Config<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("no_default_user_agent_header", &self.no_default_user_agent_header)
            .field("max_response_body_size", &self.max_response_body_size)
            .field("request_encoder", &self.request_encoder)
            .field("response_decoder", &self.response_decoder)
            .field("error_handler", &self.error_handler.as_ref().map(|_| "Fn(&Response) -> Error"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::Response;

    fn not_found() -> Response {
        Response {
            status: 404,
            headers: Vec::new(),
            body: b"gone".to_vec(),
        }
    }

    #[test]
    fn zero_config_gets_every_default() {
        let cfg = Config::default().effective();
        assert_eq!(cfg.name, DEFAULT_USER_AGENT);
        assert!(cfg.name.starts_with("verb-client/"));
        assert_eq!(cfg.read_timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.write_timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.max_response_body_size, DEFAULT_MAX_RESPONSE_BODY_SIZE);
        assert!(!cfg.no_default_user_agent_header);

        let handler = cfg.error_handler.expect("default handler");
        let err = handler(&not_found());
        assert!(matches!(err, Error::Status { status: 404, .. }));
    }

    #[test]
    fn timeouts_default_independently() {
        let cfg = Config {
            read_timeout: Duration::from_millis(250),
            ..Config::default()
        }
        .effective();
        assert_eq!(cfg.read_timeout, Duration::from_millis(250));
        assert_eq!(cfg.write_timeout, DEFAULT_TIMEOUT);

        let cfg = Config {
            write_timeout: Duration::from_secs(2),
            ..Config::default()
        }
        .effective();
        assert_eq!(cfg.read_timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.write_timeout, Duration::from_secs(2));
    }

    #[test]
    fn explicit_values_are_kept() {
        let cfg = Config {
            name: "billing-sync".to_string(),
            no_default_user_agent_header: true,
            max_response_body_size: 512,
            ..Config::default()
        }
        .error_handler(|resp| Error::Handler(format!("upstream said {}", resp.status).into()))
        .effective();

        assert_eq!(cfg.name, "billing-sync");
        assert!(cfg.no_default_user_agent_header);
        assert_eq!(cfg.max_response_body_size, 512);
        let handler = cfg.error_handler.expect("custom handler");
        assert_eq!(handler(&not_found()).to_string(), "upstream said 404");
    }

    #[test]
    fn swapping_codecs_keeps_other_fields() {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Marker;

        let cfg = Config {
            name: "custom".to_string(),
            ..Config::default()
        }
        .request_encoder(Marker)
        .response_decoder(Marker);

        assert_eq!(cfg.name, "custom");
        assert_eq!(cfg.request_encoder, Marker);
        assert_eq!(cfg.response_decoder, Marker);
        assert!(format!("{cfg:?}").contains("custom"));
    }
}
