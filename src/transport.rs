//! The HTTP transport seam.
//!
//! [`crate::Client`] never talks to the network itself; it hands a fully merged
//! [`RequestOptions`] to a [`Transport`] and gets a [`Response`] back. Connection pooling,
//! TLS, timeouts, redirects and the status-code policy all live behind this trait.
//! [`ReqwestTransport`] is the implementation used unless the caller brings their own.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, StatusCode};

use crate::Result;
use crate::error::Error;
use crate::options::RequestOptions;

/// Executes one HTTP request.
///
/// Implementations decide how to treat non-success statuses; the client does no status
/// inspection of its own and propagates any error unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, url: &str, options: RequestOptions)
    -> Result<Response>;
}

/// What a [`Transport`] hands back: status, headers and the raw body.
#[non_exhaustive]
#[derive(Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// Any non-2xx status is turned into an [`crate::error::Kind::Status`] error carrying the
/// response text; network failures surface as [`crate::error::Kind::Transport`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client, e.g. one configured with timeouts or a proxy.
    #[must_use]
    pub fn from_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, options),
            fields(status_code)
        )
    )]
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let query = options.query_string();
        let url = if query.is_empty() {
            url.to_owned()
        } else {
            format!("{url}?{query}")
        };

        let mut headers = HeaderMap::new();
        for (name, value) in options.headers() {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = options.json_body() {
            builder = builder.json(body);
        }
        let request = builder.build()?;
        let path = request.url().path().to_owned();

        let response = self.client.execute(request).await?;
        let status_code = response.status();

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status_code", status_code.as_u16());

        if !status_code.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::status(status_code, method, path, message));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Response::new(status_code, headers, body.to_vec()))
    }
}
