//! HTTP side of the dashboard: the snapshot stream, job controls and
//! thumbnail retrieval, all over one shared `reqwest` client.

pub mod control;
pub mod stream;
pub mod thumbs;

use std::time::Duration;

use crate::error::AppResult;

/// Builds the shared HTTP client. One client serves the stream, the control
/// posts and the thumbnail fetches, so connections are reused.
pub fn build_client(connect_timeout: Duration) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder().connect_timeout(connect_timeout).build()?;
    Ok(client)
}
