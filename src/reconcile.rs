//! Snapshot reconciliation.
//!
//! One snapshot in, a batch of state mutations plus a list of side effects
//! out. The steps run in a fixed order so that scalar fields, bars, lists
//! and controls are updated before the terminal check closes the session.
//! Effects are plain data; the event loop decides how to execute them.

use crate::fmt;
use crate::state::{AppendOutcome, DashState};
use crate::types::Snapshot;

/// Side effects requested by a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The thumbnail identifier changed; fetch the new image.
    FetchThumbnail(String),
    /// A terminal snapshot was applied; tear the stream down.
    CloseStream,
}

/// Applies one snapshot to the session state.
///
/// On a closed session this is a no-op and returns no effects, whatever the
/// snapshot says. Every field is optional on the wire; absent numerics read
/// as 0, absent strings as empty, absent collections leave their view
/// untouched.
pub fn apply(state: &mut DashState, snap: &Snapshot) -> Vec<Effect> {
    if state.is_closed() {
        return Vec::new();
    }

    let mut effects = Vec::new();
    apply_text_fields(state, snap);
    apply_bars(state, snap);
    apply_current_file(state, snap);
    apply_thumbnail(state, snap, &mut effects);
    apply_scanned(state, snap);
    apply_remaining(state, snap);
    apply_duplicates(state, snap);
    apply_pause(state, snap);
    apply_terminal(state, snap, &mut effects);
    effects
}

/// Scalar headline fields: stage, counters and the formatted stat lines.
fn apply_text_fields(state: &mut DashState, snap: &Snapshot) {
    state.stage = snap.stage.clone().unwrap_or_default();
    state.counter =
        format!("{}/{}", snap.progress.unwrap_or(0), snap.total.unwrap_or(0));
    state.bytes_line = format!(
        "{} / {}",
        fmt::format_bytes(snap.bytes_scanned.unwrap_or(0)),
        fmt::format_bytes(snap.bytes_total.unwrap_or(0))
    );
    state.speed_line = fmt::format_speed(snap.speed.unwrap_or(0.0));
    state.eta_line = fmt::format_eta(snap.eta.unwrap_or(0));
    state.eta_wall = match snap.eta {
        Some(secs) => fmt::eta_wall_clock(secs),
        None => String::new(),
    };
    state.dup_bytes_line = fmt::format_bytes(snap.duplicate_bytes.unwrap_or(0));
    state.group_count = snap.dup_groups.unwrap_or(0);
    state.largest_group = snap.largest_group.unwrap_or(0);
    state.sys_line = fmt::format_sys(
        snap.cpu.unwrap_or(0.0),
        snap.mem.unwrap_or(0.0),
        snap.free.unwrap_or(0.0),
    );
}

/// Bars: the overall bar only moves while the producer reports a nonzero
/// total, the per-file bar moves every snapshot.
fn apply_bars(state: &mut DashState, snap: &Snapshot) {
    let total = snap.total.unwrap_or(0);
    if total > 0 {
        let progress = snap.progress.unwrap_or(0);
        state.overall.set(progress as f64 * 100.0 / total as f64);
    }
    state.file.set(snap.file_pct.unwrap_or(0.0));
}

fn apply_current_file(state: &mut DashState, snap: &Snapshot) {
    state.current_file = snap.current_file.clone().unwrap_or_default();
}

/// Requests a fetch only when the thumbnail identifier actually changed.
/// An absent identifier keeps whatever is on display.
fn apply_thumbnail(state: &mut DashState, snap: &Snapshot, effects: &mut Vec<Effect>) {
    if let Some(id) = &snap.thumbnail {
        if state.thumb.observe(id) {
            effects.push(Effect::FetchThumbnail(id.clone()));
        }
    }
}

fn apply_scanned(state: &mut DashState, snap: &Snapshot) {
    if let Some(names) = &snap.scanned_names {
        if state.scanned.append_new(names) == AppendOutcome::Resynced {
            state.metrics.inc_list_resyncs();
            tracing::warn!(
                job_id = %state.job_id,
                delivered = names.len(),
                "scanned list contradicted the rendered prefix, resynchronized"
            );
        }
    }
}

fn apply_remaining(state: &mut DashState, snap: &Snapshot) {
    if let Some(entries) = &snap.remaining {
        state.remaining.replace(entries.clone());
    }
}

/// Inserts a row per newly seen group key. Member payloads are opaque; only
/// the count at first observation matters.
fn apply_duplicates(state: &mut DashState, snap: &Snapshot) {
    if let Some(groups) = &snap.duplicates {
        for (key, members) in groups {
            state.dupes.observe(key, members.len());
        }
    }
}

/// Pause look follows the server-confirmed flag, presence-checked.
fn apply_pause(state: &mut DashState, snap: &Snapshot) {
    if let Some(paused) = snap.paused {
        state.controls.sync_pause(paused);
    }
}

/// The terminal check runs last. An explicit stop wins over the done flag
/// the producer sets on its way out.
fn apply_terminal(state: &mut DashState, snap: &Snapshot, effects: &mut Vec<Effect>) {
    if snap.is_terminal() {
        state.mark_terminal(!snap.stop.unwrap_or(false));
        effects.push(Effect::CloseStream);
    }
}
