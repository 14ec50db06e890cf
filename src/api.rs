use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::endpoint::join_url;
use crate::error::ExtractError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of JSON documents addressed by API path (`/merchants/30`).
pub trait ApiClient {
    fn get_json(&self, path: &str) -> Result<Value, ExtractError>;
}

#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self, ExtractError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("fixture-extract/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut builder = Client::builder().default_headers(headers).timeout(timeout);
        if is_loopback(base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|err| ExtractError::Transport {
                url: base_url.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn handle_status(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ExtractError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(ExtractError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}

impl ApiClient for HttpApiClient {
    fn get_json(&self, path: &str) -> Result<Value, ExtractError> {
        let url = self.url_for(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ExtractError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;
        let response = Self::handle_status(&url, response)?;
        response.json::<Value>().map_err(|err| {
            if err.is_decode() {
                ExtractError::Decode {
                    url,
                    message: err.to_string(),
                }
            } else {
                ExtractError::Transport {
                    url,
                    message: err.to_string(),
                }
            }
        })
    }
}

/// Accepts only objects and arrays. Empty containers are valid documents;
/// `null` and scalars are not.
pub fn require_document(path: &str, value: Value) -> Result<Value, ExtractError> {
    let kind = match &value {
        Value::Object(_) | Value::Array(_) => return Ok(value),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
    };
    Err(ExtractError::Decode {
        url: path.to_string(),
        message: format!("expected a JSON object or array, got {kind}"),
    })
}

fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}

impl<T: ApiClient + ?Sized> ApiClient for &T {
    fn get_json(&self, path: &str) -> Result<Value, ExtractError> {
        (**self).get_json(path)
    }
}
