use std::time::Duration;

use na_core::Result;
use reqwest::Client;

const USER_AGENT: &str = concat!("newsagg/", env!("CARGO_PKG_VERSION"));

/// One pooled client shared by every adapter. The timeout covers the whole
/// request, so a stalled upstream surfaces as an ordinary fetch error.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
