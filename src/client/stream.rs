//! The snapshot reader task.
//!
//! Subscribes to the server's push channel and forwards decoded snapshots
//! over an unbounded channel. The task never reconnects: the first transport
//! error or server-side end tears the subscription down for good, and the
//! event loop decides what that means for the session.

use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::metrics::Metrics;
use crate::types::Snapshot;

/// What the reader task forwards to the event loop.
#[derive(Debug)]
pub enum StreamEvent {
    /// The subscription is established.
    Opened,
    /// One decoded snapshot frame.
    Snapshot(Snapshot),
    /// The server ended the stream on its own terms.
    Ended,
    /// The transport failed underneath us.
    TransportError(String),
}

/// Spawns the reader. The returned receiver yields events until the stream
/// closes or the token is cancelled; the handle completes once the task has
/// torn the connection down.
pub fn spawn_reader(
    client: reqwest::Client,
    base_url: &str,
    job_id: Uuid,
    cancel: CancellationToken,
    metrics: Metrics,
) -> (JoinHandle<()>, mpsc::UnboundedReceiver<StreamEvent>) {
    let url = format!("{}/progress_stream/{}", base_url, job_id);
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut es = match client.get(&url).eventsource() {
            Ok(es) => es,
            Err(e) => {
                tracing::error!(%job_id, "failed to build snapshot subscription: {}", e);
                let _ = tx.send(StreamEvent::TransportError(e.to_string()));
                return;
            }
        };
        tracing::info!(%job_id, url = %url, "subscribing to snapshot stream");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    es.close();
                    break;
                }
                event = es.next() => match event {
                    Some(Ok(Event::Open)) => {
                        tracing::info!(%job_id, "snapshot stream open");
                        let _ = tx.send(StreamEvent::Opened);
                    }
                    Some(Ok(Event::Message(msg))) => {
                        if let Some(snap) = decode_frame(&msg.data, &metrics) {
                            if tx.send(StreamEvent::Snapshot(snap)).is_err() {
                                // Receiver dropped, exit task
                                es.close();
                                break;
                            }
                        }
                    }
                    Some(Err(reqwest_eventsource::Error::StreamEnded)) => {
                        tracing::info!(%job_id, "snapshot stream ended by server");
                        let _ = tx.send(StreamEvent::Ended);
                        es.close();
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(%job_id, "snapshot stream failed: {}", e);
                        let _ = tx.send(StreamEvent::TransportError(e.to_string()));
                        es.close();
                        break;
                    }
                    None => {
                        let _ = tx.send(StreamEvent::Ended);
                        break;
                    }
                }
            }
        }
    });

    (handle, rx)
}

/// Decodes one data frame. Keepalive and empty frames are skipped silently,
/// undecodable frames are counted and dropped so one bad frame cannot stall
/// the session.
fn decode_frame(data: &str, metrics: &Metrics) -> Option<Snapshot> {
    if data.is_empty() || data == "keepalive" || data == "keep-alive" {
        tracing::debug!("skipping keepalive frame");
        return None;
    }
    match serde_json::from_str::<Snapshot>(data) {
        Ok(snap) => Some(snap),
        Err(e) => {
            metrics.inc_snapshots_dropped();
            let excerpt: String = data.chars().take(120).collect();
            tracing::warn!("dropping undecodable frame: {} (data: {})", e, excerpt);
            None
        }
    }
}
