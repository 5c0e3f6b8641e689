//! Plain-data request and response values handed to the pluggable behaviors.
//!
//! # Design
//! Encoders see a `Request` before it reaches the transport, and decoders and
//! error handlers see a fully buffered `Response` after it comes back. Both are
//! owned by a single call and dropped when it returns, whichever phase ends it.
//!
//! Header names compare case-insensitively, as on the wire.

use std::collections::HashMap;
use std::fmt;

/// Extra headers supplied per call. Keys are unique, so iteration order does
/// not matter.
pub type Header = HashMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request, built by the client and filled in by the encoder.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response whose body has already been read off the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// True for status codes in 200..=299 and nothing else. A 304 is a failure.
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Response {
        Response {
            status,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: b"hello".to_vec(),
        }
    }

    #[test]
    fn method_tokens() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn set_header_overwrites_case_insensitively() {
        let mut req = Request::new(Method::Get, "http://localhost/");
        req.set_header("user-agent", "default");
        req.set_header("X-Other", "1");
        req.set_header("User-Agent", "custom");

        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("USER-AGENT"), Some("custom"));
        assert_eq!(req.header("x-other"), Some("1"));
        assert_eq!(req.header("missing"), None);
    }

    #[test]
    fn new_request_is_empty() {
        let req = Request::new(Method::Delete, "http://localhost/items/1");
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.uri, "http://localhost/items/1");
        assert!(req.headers.is_empty());
        assert!(req.body.is_empty());
    }

    #[test]
    fn success_range_is_exactly_2xx() {
        assert!(!response(199).is_success());
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(response(299).is_success());
        assert!(!response(300).is_success());
        assert!(!response(304).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
        assert!(!response(0).is_success());
    }

    #[test]
    fn response_text_is_lossy() {
        let mut resp = response(200);
        assert_eq!(resp.text(), "hello");
        resp.body = vec![b'o', b'k', 0xff];
        assert_eq!(resp.text(), "ok\u{fffd}");
        assert_eq!(resp.header("content-type"), Some("text/plain"));
    }
}
