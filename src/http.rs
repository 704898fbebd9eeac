use crate::endpoint::{EndpointDefinition, Method};
use crate::error::Result;
use crate::media;
use crate::response::{normalize, Normalized, RawResponse, RequestResult, ResponseBody};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, CONTENT_ENCODING, CONTENT_TYPE};
use std::error::Error as StdError;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const USER_AGENT: &str = concat!("htup/", env!("CARGO_PKG_VERSION"));

pub struct HttpClient {
    client: Client,
    media_dir: PathBuf,
}

impl Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &"Client")
            .field("media_dir", &self.media_dir)
            .finish()
    }
}

impl HttpClient {
    pub fn new(media_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(HttpClient {
            client,
            media_dir: media_dir.into(),
        })
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Sends one request. Only an unsupported `method` is an error; every
    /// transport problem comes back as a sentinel [`RequestResult`].
    pub fn send(&self, url: &str, method: &str, body: &str) -> Result<RequestResult> {
        let method: Method = method.parse()?;
        Ok(self.send_endpoint(&EndpointDefinition::new(method, url, body)))
    }

    /// Sends a saved definition, including its extra headers. A header that
    /// is not a valid HTTP header fails the request like any transport error.
    pub fn send_endpoint(&self, endpoint: &EndpointDefinition) -> RequestResult {
        let url = endpoint.url.as_str();
        debug!(
            method = %endpoint.method,
            url,
            body_len = endpoint.body.len(),
            headers = endpoint.headers.len(),
            "dispatching request"
        );

        let start = Instant::now();
        let res = match self.build_request(endpoint).send() {
            Ok(res) => res,
            Err(e) => return transport_failure(url, &e),
        };
        let elapsed = start.elapsed();

        let status = res.status().as_u16();
        let content_type = header_str(res.headers(), CONTENT_TYPE.as_str());
        let content_encoding = header_str(res.headers(), CONTENT_ENCODING.as_str());
        let body = match res.bytes() {
            Ok(bytes) => bytes,
            Err(e) => return transport_failure(url, &e),
        };
        debug!(status, ?content_type, bytes = body.len(), ?elapsed, "response received");

        let raw = RawResponse {
            status,
            content_type,
            content_encoding,
            body,
            elapsed,
        };

        match normalize(raw) {
            Normalized::Complete(result) => result,
            Normalized::Media { mut result, bytes } => {
                match media::persist(&bytes, &result.content_type, &self.media_dir) {
                    Ok(path) => result.media_path = Some(path),
                    Err(e) => {
                        warn!(error = %e, "failed to save media payload");
                        result.body = ResponseBody::Error(format!("failed to save media: {e}"));
                    }
                }
                result
            }
        }
    }

    fn build_request(&self, endpoint: &EndpointDefinition) -> RequestBuilder {
        let url = endpoint.url.as_str();
        let mut req_builder = match endpoint.method {
            Method::Get => self.client.get(url),
            Method::Delete => self.client.delete(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
        };

        for (name, value) in &endpoint.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if endpoint.method.sends_body() {
            if !endpoint.has_header(CONTENT_TYPE.as_str()) {
                req_builder = req_builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
            }
            req_builder.body(endpoint.body.clone())
        } else {
            req_builder
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn transport_failure(url: &str, err: &reqwest::Error) -> RequestResult {
    let description = describe(err);
    warn!(url, error = %description, "request did not complete");
    RequestResult::transport_failure(description)
}

/// Flattens an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_str = cause.to_string();
        if !description.contains(&cause_str) {
            description.push_str(": ");
            description.push_str(&cause_str);
        }
        source = cause.source();
    }
    description
}
