//! The event loop.
//!
//! One task owns the session state and the terminal. Snapshot events, key
//! presses, control feedback and the housekeeping tick are multiplexed
//! here; reconciliation effects are executed in the order they were
//! requested.

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::stream::{spawn_reader, StreamEvent};
use crate::client::thumbs::ThumbStore;
use crate::client::{self, control};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::reconcile::{self, Effect};
use crate::state::{DashState, NoticeLevel, PauseLook, StreamPhase};
use crate::types::{ControlCommand, SortKey};
use crate::ui::{keys, keys::UserAction, Tui};

pub async fn run(
    cfg: &AppConfig,
    job_id: Uuid,
    initial_sort: Option<SortKey>,
) -> AppResult<()> {
    let metrics = Metrics::new();
    let client = client::build_client(Duration::from_millis(cfg.server.connect_timeout_ms))?;
    let cancel = CancellationToken::new();
    let (reader, mut events) = spawn_reader(
        client.clone(),
        &cfg.server.base_url,
        job_id,
        cancel.clone(),
        metrics.clone(),
    );
    let mut thumbs = ThumbStore::new(
        client.clone(),
        cfg.server.base_url.clone(),
        cfg.thumbnails.cache_capacity,
        metrics.clone(),
    );
    let (feedback_tx, mut feedback_rx) = mpsc::unbounded_channel::<String>();

    let mut state =
        DashState::new(job_id, metrics.clone(), Duration::from_millis(cfg.ui.notice_ttl_ms));
    state.results_url = format!("{}/results/{}", cfg.server.base_url, job_id);
    // Holds until the first remaining delivery, which resets the sort to name
    if let Some(key) = initial_sort {
        state.remaining.sort_by(key);
    }

    let mut tui = Tui::enter()?;
    let mut term_events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(cfg.ui.tick_ms));

    loop {
        tui.draw(&state)?;

        tokio::select! {
            event = events.recv() => match event {
                Some(StreamEvent::Opened) => {
                    if state.phase == StreamPhase::Connecting {
                        state.phase = StreamPhase::Streaming;
                    }
                }
                Some(StreamEvent::Snapshot(snap)) => {
                    let was_closed = state.is_closed();
                    let effects = reconcile::apply(&mut state, &snap);
                    if !was_closed {
                        metrics.inc_snapshots_applied();
                    }
                    for effect in effects {
                        match effect {
                            Effect::FetchThumbnail(id) => {
                                if let Some(len) = thumbs.fetch(&id).await {
                                    state.thumb.record_fetched(&id, len);
                                }
                            }
                            Effect::CloseStream => cancel.cancel(),
                        }
                    }
                }
                Some(StreamEvent::Ended) => {
                    on_stream_end(&mut state, "stream ended without a terminal snapshot");
                }
                Some(StreamEvent::TransportError(e)) => {
                    on_stream_end(&mut state, &format!("connection lost: {}", e));
                }
                None => {
                    if !state.is_closed() {
                        on_stream_end(&mut state, "stream reader stopped");
                    }
                }
            },
            key = term_events.next() => match key {
                Some(Ok(Event::Key(key))) => match keys::handle_key(&mut state, key) {
                    Some(UserAction::Quit) => break,
                    Some(UserAction::TogglePause) => {
                        if state.controls.pause_enabled() {
                            let command = match state.controls.pause_look() {
                                PauseLook::Running => ControlCommand::Pause,
                                PauseLook::Paused => ControlCommand::Resume,
                            };
                            control::dispatch(
                                client.clone(),
                                cfg.server.base_url.clone(),
                                job_id,
                                command,
                                metrics.clone(),
                                feedback_tx.clone(),
                            );
                        }
                    }
                    Some(UserAction::Stop) => {
                        if state.controls.take_stop() {
                            control::dispatch(
                                client.clone(),
                                cfg.server.base_url.clone(),
                                job_id,
                                ControlCommand::Stop,
                                metrics.clone(),
                                feedback_tx.clone(),
                            );
                        }
                    }
                    None => {}
                },
                // Resizes repaint on the next pass anyway
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("terminal event error: {}", e);
                }
                None => break,
            },
            feedback = feedback_rx.recv() => {
                if let Some(text) = feedback {
                    state.set_notice(text, NoticeLevel::Warn);
                }
            }
            _ = tick.tick() => {
                state.prune_notice(Instant::now());
            }
        }
    }

    cancel.cancel();
    let _ = reader.await;
    tui.exit()?;

    let summary = metrics.get_snapshot();
    tracing::info!(?summary, %job_id, "session finished");
    Ok(())
}

/// The connection died or ended early. The last rendered state stays on
/// screen and the controls remain usable; only the phase and a notice
/// change.
fn on_stream_end(state: &mut DashState, reason: &str) {
    if state.is_closed() {
        return;
    }
    tracing::warn!(job_id = %state.job_id, "{}", reason);
    state.mark_transport_closed();
    state.set_notice(reason.to_string(), NoticeLevel::Warn);
}
