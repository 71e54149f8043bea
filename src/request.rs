//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a request body could not be decoded into the expected shape.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("invalid request body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: http::Method,
    pub(crate) uri: http::Uri,
    pub(crate) headers: http::HeaderMap,
    pub(crate) extensions: http::Extensions,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            extensions: parts.extensions,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &http::HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/usuarios/{id}`, `req.param("id")` on
    /// `/api/usuarios/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decoded query-string pairs in the order they appear.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.uri.query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shared state attached with [`Router::with_state`](crate::Router::with_state).
    pub fn state<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Decodes the body into `T`.
    ///
    /// `application/x-www-form-urlencoded` bodies become an object of string
    /// fields; anything else is parsed as JSON and must be an object. Arrays
    /// and scalars are rejected before `T` sees them, so a struct is never
    /// filled positionally. An empty body decodes as the empty object, so a
    /// missing field surfaces as a validation problem rather than a parse
    /// error.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Object(Map::new()))?);
        }

        if self.is_form() {
            let fields = url::form_urlencoded::parse(&self.body)
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect::<Map<_, _>>();
            return Ok(serde_json::from_value(Value::Object(fields))?);
        }

        match serde_json::from_slice(&self.body)? {
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            _ => Err(BodyError::NotAnObject),
        }
    }

    fn is_form(&self) -> bool {
        self.header("content-type")
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
    }
}
