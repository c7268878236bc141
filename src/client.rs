//! Client for the ChurchTools REST API.
//!
//! Every endpoint method goes through [`Client::request`], which validates the call,
//! layers the caller's [`RequestOptions`] over the authentication defaults and hands the
//! result to the injected [`Transport`].
//!
//! # Example
//!
//! ```no_run
//! use churchtools_client::Client;
//! use churchtools_client::types::PersonsRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_reqwest("https://demo.church.tools/api", "my-login-token");
//!
//! let me = client.current_user().await?;
//! println!("logged in as {:?}", me.get("firstName"));
//!
//! let persons = client
//!     .persons(&PersonsRequest::builder().limit(5).build())
//!     .await?;
//! println!("{} persons visible", persons.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use bon::bon;
use reqwest::Method;
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::error::Error;
use crate::options::RequestOptions;
use crate::transport::{ReqwestTransport, Response, Transport};
use crate::types::{Payload, PersonsRequest};

/// Identifies this library in the `User-Agent` header.
pub const CLIENT_NAME: &str = "churchtools-client-rs";

/// Connection settings for a [`Client`]. Immutable once built.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Config {
    /// API root without trailing slashes, e.g. `https://example.church.tools/api`.
    base_url: String,
    /// Sent as `Authorization: Login <token>`.
    token: SecretString,
    user_agent: String,
}

#[bon]
impl Config {
    /// Builds a config. Trailing slashes are stripped from `base_url`; `user_agent`
    /// defaults to [`default_user_agent`].
    #[builder]
    pub fn new(
        #[builder(into)] base_url: String,
        #[builder(into)] token: String,
        #[builder(into)] user_agent: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: SecretString::from(token),
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// `churchtools-client-rs/<version> (<os>)`, where `<os>` is the operating system this
/// binary was built for.
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "{CLIENT_NAME}/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

/// ChurchTools API client.
///
/// Holds its [`Config`] and a shared handle to a [`Transport`]; the transport's lifecycle
/// belongs to whoever created it. Cloning a client is cheap and clones share the transport.
pub struct Client<T: Transport = ReqwestTransport> {
    transport: Arc<T>,
    config: Config,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client<ReqwestTransport> {
    /// Creates a client on a fresh [`ReqwestTransport`].
    #[must_use]
    pub fn with_reqwest<S: Into<String>>(base_url: &str, token: S) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), base_url, token)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client. No I/O is performed.
    #[must_use]
    pub fn new<S: Into<String>>(transport: Arc<T>, base_url: &str, token: S) -> Self {
        let config = Config::builder().base_url(base_url).token(token).build();
        Self::with_config(transport, config)
    }

    #[must_use]
    pub fn with_config(transport: Arc<T>, config: Config) -> Self {
        Self { transport, config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Options every request starts from before the caller's options are merged in.
    fn default_options(&self) -> RequestOptions {
        RequestOptions::new()
            .header(
                "Authorization",
                format!("Login {}", self.config.token.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .header("User-Agent", self.config.user_agent.as_str())
    }

    /// Sends `method` to `{base_url}{api_path}` and returns the transport's response as is.
    ///
    /// `api_path` must start with `/`, and a `GET` must not carry a non-empty body. Both
    /// are checked before the transport is called. An empty `GET` body is dropped, so it
    /// never reaches the wire. The caller's `options` are merged over the defaults
    /// (`Authorization`, `Content-Type`, `User-Agent`), caller values winning.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, options), fields(base_url = %self.config.base_url))
    )]
    pub async fn request(
        &self,
        method: Method,
        api_path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        if method == Method::GET && options.has_body() {
            return Err(Error::validation(format!(
                "GET {api_path} cannot carry a body, use POST or PUT instead"
            )));
        }
        if !api_path.starts_with('/') {
            return Err(Error::validation(format!(
                "API path `{api_path}` must start with a forward slash"
            )));
        }

        let options = if method == Method::GET {
            options.without_empty_body()
        } else {
            options
        };
        let options = options.merged_over(self.default_options())?;
        let url = format!("{}{api_path}", self.config.base_url);

        self.transport.request(method, &url, options).await
    }

    /// [`Client::request`] followed by decoding the body as JSON into `R`.
    pub async fn request_json<R: DeserializeOwned>(
        &self,
        method: Method,
        api_path: &str,
        options: RequestOptions,
    ) -> Result<R> {
        let response = self.request(method, api_path, options).await?;
        decode(&response)
    }

    /// `GET /info`: public information about the server.
    pub async fn server_info(&self) -> Result<Payload> {
        self.request_json(Method::GET, "/info", RequestOptions::new())
            .await
    }

    /// `GET /whoami`: the person the token authenticates as.
    pub async fn current_user(&self) -> Result<Payload> {
        self.request_json(Method::GET, "/whoami", RequestOptions::new())
            .await
    }

    /// `GET /persons`: the persons visible to the current user, filtered by `request`.
    ///
    /// Each record contains only the fields the user may view. An empty list is a normal
    /// result, not an error.
    pub async fn persons(&self, request: &PersonsRequest) -> Result<Vec<Payload>> {
        let options = RequestOptions::new().query_from(request)?;
        self.request_json(Method::GET, "/persons", options).await
    }

    /// `GET /persons/{person_id}/logintoken`: the login token of another person.
    ///
    /// Returns the `data` field of the response; a response without a string `data`
    /// field is a [`crate::error::Kind::Decode`] error.
    pub async fn person_login_token(&self, person_id: i64) -> Result<String> {
        let path = format!("/persons/{person_id}/logintoken");
        let mut payload: Payload = self
            .request_json(Method::GET, &path, RequestOptions::new())
            .await?;

        match payload.remove("data") {
            Some(Value::String(token)) => Ok(token),
            _ => Err(Error::missing_field("data", path)),
        }
    }
}

fn decode<R: DeserializeOwned>(response: &Response) -> Result<R> {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        type_name = %std::any::type_name::<R>(),
        bytes = response.body().len(),
        "decoding JSON response"
    );

    Ok(serde_json::from_slice(response.body())?)
}
