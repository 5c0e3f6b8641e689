//! Request body encoding and response body decoding.
//!
//! The client is generic over both traits, with JSON as the default.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BoxError;
use crate::http::{Request, Response};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Writes an input value into the request body and sets any content headers.
pub trait RequestEncoder: Send + Sync {
    fn encode<T>(&self, request: &mut Request, value: &T) -> Result<(), BoxError>
    where
        T: Serialize + ?Sized;
}

/// Parses a successful response body into the caller's output type.
pub trait ResponseDecoder: Send + Sync {
    fn decode<T>(&self, response: &Response) -> Result<T, BoxError>
    where
        T: DeserializeOwned;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl RequestEncoder for JsonEncoder {
    fn encode<T>(&self, request: &mut Request, value: &T) -> Result<(), BoxError>
    where
        T: Serialize + ?Sized,
    {
        request.body = serde_json::to_vec(value)?;
        request.set_header("Content-Type", CONTENT_TYPE_JSON);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode<T>(&self, response: &Response) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::http::Method;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        tags: Vec<String>,
        count: Option<u32>,
    }

    fn ok(body: Vec<u8>) -> Response {
        Response {
            status: 200,
            headers: Vec::new(),
            body,
        }
    }

    #[test]
    fn json_encoder_sets_body_and_content_type() {
        let mut req = Request::new(Method::Post, "http://localhost/create");
        req.set_header("content-type", "text/plain");
        JsonEncoder.encode(&mut req, &serde_json::json!({"name": "a"})).unwrap();

        assert_eq!(req.body, br#"{"name":"a"}"#);
        assert_eq!(req.header("Content-Type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn json_encode_then_decode_preserves_value() {
        let item = Item {
            name: "widget".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            count: None,
        };
        let mut req = Request::new(Method::Put, "http://localhost/items/1");
        JsonEncoder.encode(&mut req, &item).unwrap();

        let back: Item = JsonDecoder.decode(&ok(req.body)).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn json_encoder_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "pair");
        let mut req = Request::new(Method::Post, "http://localhost/");
        assert!(JsonEncoder.encode(&mut req, &map).is_err());
        assert!(req.body.is_empty());
    }

    #[test]
    fn json_decoder_rejects_bad_bodies() {
        assert!(JsonDecoder.decode::<Item>(&ok(b"not json".to_vec())).is_err());
        assert!(JsonDecoder.decode::<Item>(&ok(Vec::new())).is_err());
        assert!(JsonDecoder.decode::<Item>(&ok(br#"{"name":1}"#.to_vec())).is_err());
    }
}
