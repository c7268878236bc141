#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod error;
pub mod options;
pub mod transport;
pub mod types;

pub use client::{Client, Config};
pub use error::Error;
pub use options::RequestOptions;
/// HTTP method type, re-exported for calls through [`Client::request`].
pub use reqwest::Method;
/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};
pub use transport::{ReqwestTransport, Response, Transport};

pub type Result<T> = std::result::Result<T, Error>;
