//! Turns a completed HTTP exchange, or the lack of one, into a [`RequestResult`].
//!
//! Every dispatch produces exactly one result. A transport failure is not an
//! error value: it is a result carrying [`TRANSPORT_FAILURE_STATUS`] so callers
//! render success and failure through the same path.

use crate::decoder;
use crate::error::Error;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Not an HTTP status: no response was obtained at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 999;
pub const NO_CONTENT_TYPE: &str = "-";

const JSON_MARKER: &str = "application/json";
const AUDIO_MARKER: &str = "audio";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Error(String),
    /// The payload went to the media directory instead.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestResult {
    pub status_code: u16,
    pub content_type: String,
    pub body: ResponseBody,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_path: Option<PathBuf>,
}

impl RequestResult {
    pub fn transport_failure(description: impl Into<String>) -> Self {
        Self {
            status_code: TRANSPORT_FAILURE_STATUS,
            content_type: NO_CONTENT_TYPE.to_string(),
            body: ResponseBody::Error(description.into()),
            elapsed_seconds: 0.0,
            media_path: None,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == TRANSPORT_FAILURE_STATUS
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub body: Bytes,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum Normalized {
    Complete(RequestResult),
    /// Audio payload; the caller hands `bytes` to the media sink.
    Media { result: RequestResult, bytes: Bytes },
}

pub fn normalize(raw: RawResponse) -> Normalized {
    let content_type = raw.content_type.unwrap_or_else(|| {
        warn!(status = raw.status, error = %Error::MissingContentType, "reading body as text");
        NO_CONTENT_TYPE.to_string()
    });
    let matcher = content_type.to_ascii_lowercase();

    let mut result = RequestResult {
        status_code: raw.status,
        content_type,
        body: ResponseBody::Empty,
        elapsed_seconds: raw.elapsed.as_secs_f64(),
        media_path: None,
    };

    let bytes = match decoder::decompress(raw.body, raw.content_encoding.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.body = ResponseBody::Error(e.to_string());
            return Normalized::Complete(result);
        }
    };

    if matcher.contains(JSON_MARKER) {
        result.body = match serde_json::from_slice(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => ResponseBody::Error(format!("malformed JSON body: {e}")),
        };
    } else if matcher.contains(AUDIO_MARKER) {
        return Normalized::Media { result, bytes };
    } else {
        result.body = match decoder::decode_text(&bytes) {
            Ok(text) => ResponseBody::Text(text),
            Err(e) => ResponseBody::Error(e.to_string()),
        };
    }

    Normalized::Complete(result)
}
