// src/client/request.rs — Owned description of one logical API call
//
// Requests are kept as plain data (method, path, body) rather than as a
// reqwest builder so the same call can be rebuilt and replayed after a
// token refresh, multipart bodies included.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use crate::infra::errors::ApiError;

/// Which transport carries the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    #[default]
    Standard,
    /// Recommendation generation waits on an LLM.
    Long,
}

/// Number of refresh-and-replay rounds a request may still use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u8,
}

impl RetryBudget {
    /// One refresh per logical request.
    pub const fn single() -> Self {
        Self { remaining: 1 }
    }

    /// Never refresh; a 401 propagates immediately.
    pub const fn none() -> Self {
        Self { remaining: 0 }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Spend one retry. Returns false once the budget is exhausted.
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::single()
    }
}

/// One file field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    /// Attach the body to a builder. Multipart forms are rebuilt on every call.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    let mut file = Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
                    if let Some(mime) = &part.mime {
                        file = file
                            .mime_str(mime)
                            .map_err(|e| ApiError::Config(format!("invalid MIME type '{mime}': {e}")))?;
                    }
                    form = form.part(part.field.clone(), file);
                }
                Ok(builder.multipart(form))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub timeout: Timeout,
    pub retry: RetryBudget,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            timeout: Timeout::Standard,
            retry: RetryBudget::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::json(body)?;
        Ok(self)
    }

    pub fn with_multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryBudget) -> Self {
        self.retry = retry;
        self
    }
}
