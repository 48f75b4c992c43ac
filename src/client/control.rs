//! Job control commands.
//!
//! Commands are fired from the event loop without blocking it. A rejected or
//! failed command surfaces as a feedback line for the notice area; the
//! session state itself only ever changes on server-confirmed snapshots.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::types::ControlCommand;

/// Posts one control command and checks the answer.
pub async fn send(
    client: &reqwest::Client,
    base_url: &str,
    job_id: Uuid,
    command: ControlCommand,
) -> AppResult<()> {
    let url = format!("{}/control/{}/{}", base_url, job_id, command.as_str());
    let response = client.post(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::ControlRejected {
            command: command.as_str().to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Fires a command in the background. Success is only logged and counted;
/// failure goes out on the feedback channel for the notice line.
pub fn dispatch(
    client: reqwest::Client,
    base_url: String,
    job_id: Uuid,
    command: ControlCommand,
    metrics: Metrics,
    feedback: mpsc::UnboundedSender<String>,
) {
    tokio::spawn(async move {
        match send(&client, &base_url, job_id, command).await {
            Ok(()) => {
                metrics.inc_controls_sent();
                tracing::info!(%job_id, %command, "control command accepted");
            }
            Err(e) => {
                tracing::warn!(%job_id, %command, "control command failed: {}", e);
                let _ = feedback.send(format!("{} failed: {}", command, e));
            }
        }
    });
}
