//! The client and its shared dispatch routine.
//!
//! # Design
//! `Client` owns one `ureq::Agent` configured at construction and never
//! mutated afterwards, so a single client can be shared across threads. Every
//! verb method funnels into `dispatch`, which runs the phases of a call in
//! order: headers, encode, send, classify, decode. The per-call `Request` and
//! `Response` live on the stack of `dispatch` and are dropped on every return
//! path.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::config::AutoHeaderValue;
use ureq::http;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::codec::{JsonDecoder, JsonEncoder, RequestEncoder, ResponseDecoder};
use crate::config::Config;
use crate::error::{default_error_handler, Error, ErrorHandler, Result};
use crate::http::{Header, Method, Request, Response};

/// Blocking HTTP client with pluggable body codecs and status handling.
///
/// Output destinations are only written after a 2xx response decodes
/// successfully. When a call has no input or output, the `None` needs a type,
/// e.g. `None::<&mut ()>`.
#[derive(Clone)]
pub struct Client<E = JsonEncoder, D = JsonDecoder> {
    agent: Agent,
    name: String,
    read_timeout: Duration,
    write_timeout: Duration,
    no_default_user_agent_header: bool,
    max_response_body_size: u64,
    request_encoder: E,
    response_decoder: D,
    error_handler: ErrorHandler,
}

impl Client {
    /// Client with every setting at its default.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, D> Client<E, D>
where
    E: RequestEncoder,
    D: ResponseDecoder,
{
    /// Build a client from `config`, filling zero-valued fields with defaults.
    ///
    /// No network I/O happens here.
    pub fn with_config(config: Config<E, D>) -> Self {
        let config = config.effective();

        let builder = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_send_request(Some(config.write_timeout))
            .timeout_send_body(Some(config.write_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout));
        let builder = if config.no_default_user_agent_header {
            builder.user_agent(AutoHeaderValue::None)
        } else {
            builder.user_agent(config.name.as_str())
        };
        let agent = builder.build().new_agent();

        tracing::debug!(
            name = %config.name,
            read_timeout = ?config.read_timeout,
            write_timeout = ?config.write_timeout,
            "http client configured"
        );

        Self {
            agent,
            name: config.name,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            no_default_user_agent_header: config.no_default_user_agent_header,
            max_response_body_size: config.max_response_body_size,
            request_encoder: config.request_encoder,
            response_decoder: config.response_decoder,
            error_handler: config
                .error_handler
                .unwrap_or_else(|| Arc::new(default_error_handler)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    pub fn max_response_body_size(&self) -> u64 {
        self.max_response_body_size
    }

    pub fn get<O>(&self, uri: &str, out: Option<&mut O>, header: Option<&Header>) -> Result<()>
    where
        O: DeserializeOwned,
    {
        self.dispatch(Method::Get, uri, None::<&()>, out, header)
    }

    pub fn post<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        header: Option<&Header>,
    ) -> Result<()>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Post, uri, input, out, header)
    }

    pub fn put<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        header: Option<&Header>,
    ) -> Result<()>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Put, uri, input, out, header)
    }

    pub fn patch<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        header: Option<&Header>,
    ) -> Result<()>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Patch, uri, input, out, header)
    }

    pub fn delete<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        header: Option<&Header>,
    ) -> Result<()>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Delete, uri, input, out, header)
    }

    fn dispatch<I, O>(
        &self,
        method: Method,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        header: Option<&Header>,
    ) -> Result<()>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let mut request = Request::new(method, uri);
        if let Some(header) = header {
            for (name, value) in header {
                request.set_header(name.clone(), value.clone());
            }
        }

        if let Some(input) = input {
            if let Err(e) = self.request_encoder.encode(&mut request, input) {
                tracing::warn!(%method, uri, error = %e, "encode request failed");
                return Err(Error::Encode(e));
            }
        }

        tracing::debug!(%method, uri, "sending request");
        let response = match self.send(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, uri, error = %e, "send request failed");
                return Err(Error::Send(e));
            }
        };
        tracing::debug!(%method, uri, status = response.status, "received response");

        if !response.is_success() {
            return Err((self.error_handler)(&response));
        }

        if let Some(out) = out {
            match self.response_decoder.decode(&response) {
                Ok(value) => *out = value,
                Err(e) => {
                    tracing::warn!(%method, uri, error = %e, "decode response failed");
                    return Err(Error::Decode(e));
                }
            }
        }

        Ok(())
    }

    /// Hand the request to the agent and buffer the whole response.
    fn send(&self, request: Request) -> std::result::Result<Response, ureq::Error> {
        let Request {
            method,
            uri,
            headers,
            body,
        } = request;
        let uri = uri.as_str();

        let mut response = match method {
            Method::Get => with_headers(self.agent.get(uri), &headers).call()?,
            Method::Delete if body.is_empty() => {
                with_headers(self.agent.delete(uri), &headers).call()?
            }
            Method::Delete => with_headers(self.agent.delete(uri), &headers)
                .force_send_body()
                .send(body)?,
            Method::Post => send_body(with_headers(self.agent.post(uri), &headers), body)?,
            Method::Put => send_body(with_headers(self.agent.put(uri), &headers), body)?,
            Method::Patch => send_body(with_headers(self.agent.patch(uri), &headers), body)?,
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_body_size)
            .read_to_vec()?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<WithBody>,
    body: Vec<u8>,
) -> std::result::Result<http::Response<Body>, ureq::Error> {
    if body.is_empty() {
        builder.send_empty()
    } else {
        builder.send(body)
    }
}

impl<E: fmt::Debug, D: fmt::Debug> fmt::Debug for Client<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("name", &self.name)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("no_default_user_agent_header", &self.no_default_user_agent_header)
            .field("max_response_body_size", &self.max_response_body_size)
            .field("request_encoder", &self.request_encoder)
            .field("response_decoder", &self.response_decoder)
            .finish_non_exhaustive()
    }
}
