//! Walks the four wrapped endpoints of a ChurchTools instance.
//!
//! Run with tracing enabled:
//! ```sh
//! CHURCHTOOLS_URL=https://demo.church.tools/api CHURCHTOOLS_TOKEN=... \
//!     RUST_LOG=info,churchtools_client=debug,hyper_util=off,reqwest=off cargo run --example persons --features tracing
//! ```

use churchtools_client::Client;
use churchtools_client::types::PersonsRequest;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::var("CHURCHTOOLS_URL")?;
    let token = std::env::var("CHURCHTOOLS_TOKEN")?;
    let client = Client::with_reqwest(&base_url, token);

    match client.server_info().await {
        Ok(info) => info!(endpoint = "info", site = ?info.get("siteName"), build = ?info.get("build")),
        Err(e) => error!(endpoint = "info", error = %e),
    }

    let me = client.current_user().await?;
    info!(endpoint = "whoami", id = ?me.get("id"), first_name = ?me.get("firstName"));

    let request = PersonsRequest::builder().is_archived(false).limit(5).build();
    let persons = client.persons(&request).await?;
    info!(endpoint = "persons", count = persons.len());

    for person in &persons {
        let Some(id) = person.get("id").and_then(serde_json::Value::as_i64) else {
            continue;
        };
        match client.person_login_token(id).await {
            Ok(token) => info!(endpoint = "logintoken", person = id, token_len = token.len()),
            Err(e) => error!(endpoint = "logintoken", person = id, error = %e),
        }
    }

    Ok(())
}
