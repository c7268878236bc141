#![allow(
    dead_code,
    reason = "Not every test binary uses every helper"
)]

use std::sync::Arc;

use churchtools_client::{Client, ReqwestTransport};
use httpmock::MockServer;

// publicly known demo token
pub const TOKEN: &str = "k8SdfYkTfjXyU3Qt0i8sPOOsHJ1l2d6zTyk8qm5VBbkG6EHUg8M";

pub const AUTHORIZATION: &str = "Login k8SdfYkTfjXyU3Qt0i8sPOOsHJ1l2d6zTyk8qm5VBbkG6EHUg8M";

/// Client rooted at `{server}/api/`, so every mock path starts with `/api`.
#[must_use]
pub fn client(server: &MockServer) -> Client {
    Client::new(
        Arc::new(ReqwestTransport::new()),
        &format!("{}/api/", server.base_url()),
        TOKEN,
    )
}
