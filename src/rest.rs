use log::info;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::Error;
use crate::monitor::MonitorRequest;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Creates a monitor through `POST {base_url}/api/monitors` with a bearer token.
///
/// Only `200 OK` and `201 Created` count as success; any other status is
/// returned as [`Error::UnexpectedStatus`].
pub async fn create_monitor(
    base_url: &str,
    token: &str,
    request: &MonitorRequest,
) -> Result<(), Error> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    let endpoint = format!("{base_url}/api/monitors");
    info!("Creating monitor {} via {endpoint}", request.name);

    let response = client
        .post(&endpoint)
        .bearer_auth(token)
        .json(request)
        .send()
        .await?;

    match response.status() {
        StatusCode::OK | StatusCode::CREATED => Ok(()),
        status => Err(Error::UnexpectedStatus(status)),
    }
}
