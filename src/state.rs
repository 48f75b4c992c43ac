use std::collections::HashSet;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::metrics::Metrics;
use crate::types::{RemainingEntry, SortKey};

/// Lifecycle of the push connection.
///
/// The phase only ever moves forward: `Connecting` to `Streaming` to
/// `Closed`. Once closed, no further snapshot is applied, regardless of what
/// the transport still delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Connecting,
    Streaming,
    Closed(CloseReason),
}

/// Why the stream was closed.
///
/// `Finished` and `Stopped` are terminal job states: controls are disabled
/// and the results affordance is revealed. `Transport` means the connection
/// died under us; the dashboard keeps its last rendered state and the
/// controls stay usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Finished,
    Stopped,
    Transport,
}

/// A progress bar: clamped fill ratio plus a rounded integer label.
///
/// `set` is idempotent; calling it twice with the same value yields the same
/// fill and label as calling it once.
#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    fill: f64,
    label: String,
}

impl BarState {
    pub fn new() -> Self {
        Self { fill: 0.0, label: "0%".to_string() }
    }

    /// Clamps `value` to [0, 100] and stores fill and label. `NaN` reads
    /// as 0; infinities clamp like any other out-of-range value.
    pub fn set(&mut self, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value };
        let pct = value.clamp(0.0, 100.0);
        self.fill = pct;
        self.label = format!("{}%", pct.round() as u32);
    }

    /// Fill percentage in [0, 100].
    pub fn fill(&self) -> f64 {
        self.fill
    }

    /// Fill as a [0, 1] ratio, the shape gauge widgets want.
    pub fn ratio(&self) -> f64 {
        self.fill / 100.0
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for BarState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of merging one `scanned_names` delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The delivery extended the rendered prefix by this many entries.
    Appended(usize),
    /// The delivery contradicted the rendered prefix; the list was replaced
    /// wholesale.
    Resynced,
}

/// The append-only scanned list.
///
/// The producer sends the full ordered list every cycle; only the suffix
/// beyond the retained count is appended, so nothing already rendered moves
/// or repeats. The rendered count lives here, never derived from the
/// rendering surface.
#[derive(Debug, Clone, Default)]
pub struct ScannedList {
    items: Vec<String>,
}

impl ScannedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the authoritative full list for this cycle.
    ///
    /// When the delivery is a superset-by-prefix of the retained items, the
    /// new suffix is appended in order. A delivery that contradicts the
    /// retained prefix (shorter, or differing entries) is outside the
    /// producer contract; the list is then resynchronized wholesale instead
    /// of guessing.
    pub fn append_new(&mut self, full: &[String]) -> AppendOutcome {
        let rendered = self.items.len();
        if full.len() >= rendered && full[..rendered] == self.items[..] {
            self.items.extend(full[rendered..].iter().cloned());
            AppendOutcome::Appended(full.len() - rendered)
        } else {
            self.items = full.to_vec();
            AppendOutcome::Resynced
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The sortable "Remaining" view: the latest full replacement collection,
/// re-sorted in place under the active key.
#[derive(Debug, Clone, Default)]
pub struct RemainingView {
    entries: Vec<RemainingEntry>,
    sort: SortKey,
}

impl RemainingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the buffered collection with a fresh delivery. The sort key
    /// resets to `Name`, like the original consumer re-sorting every
    /// arrival by name.
    pub fn replace(&mut self, entries: Vec<RemainingEntry>) {
        self.entries = entries;
        self.sort = SortKey::Name;
        self.apply_sort();
    }

    /// Re-sorts the buffered collection under `key`. Callable at any time,
    /// independent of stream activity.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = key;
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        match self.sort {
            SortKey::Name => {
                self.entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
            SortKey::Size => self.entries.sort_by(|a, b| b.size.cmp(&a.size)),
        }
    }

    pub fn entries(&self) -> &[RemainingEntry] {
        &self.entries
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One rendered duplicate-group row, frozen at first observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DupRow {
    pub key: String,
    /// Truncated key plus member count, e.g. `"3f9c2a1b8d4e… (2)"`.
    pub label: String,
    pub members: usize,
}

/// The duplicate-group panel: one row per unique key, in order of first
/// observation. Rows never change once inserted, even when a later snapshot
/// grows the group.
#[derive(Debug, Clone, Default)]
pub struct DupPanel {
    rows: Vec<DupRow>,
    seen: HashSet<String>,
}

impl DupPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one `(key, member count)` observation. Returns true when the
    /// key was new and a row was inserted.
    pub fn observe(&mut self, key: &str, members: usize) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        let head: String = key.chars().take(12).collect();
        self.rows.push(DupRow {
            key: key.to_string(),
            label: format!("{}… ({})", head, members),
            members,
        });
        true
    }

    pub fn rows(&self) -> &[DupRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Visual state of the pause control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseLook {
    Running,
    Paused,
}

/// The two job controls.
///
/// The pause look flips only on server-confirmed state (a snapshot carrying
/// `paused`), never optimistically on a keypress. Stop disables itself the
/// moment it fires, so the command goes out at most once. A terminal
/// snapshot disables both for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pause_look: PauseLook,
    pause_enabled: bool,
    stop_enabled: bool,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self { pause_look: PauseLook::Running, pause_enabled: true, stop_enabled: true }
    }

    /// Applies a server-confirmed pause state.
    pub fn sync_pause(&mut self, paused: bool) {
        self.pause_look = if paused { PauseLook::Paused } else { PauseLook::Running };
    }

    /// Claims the one allowed stop activation. Returns true exactly once
    /// while the control is still enabled.
    pub fn take_stop(&mut self) -> bool {
        if self.stop_enabled {
            self.stop_enabled = false;
            true
        } else {
            false
        }
    }

    /// Permanently disables both controls. There is no way back.
    pub fn disable_all(&mut self) {
        self.pause_enabled = false;
        self.stop_enabled = false;
    }

    pub fn pause_look(&self) -> PauseLook {
        self.pause_look
    }

    pub fn pause_enabled(&self) -> bool {
        self.pause_enabled
    }

    pub fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// The currently displayed thumbnail, tracked by identifier so an unchanged
/// identifier never triggers another fetch.
#[derive(Debug, Clone, Default)]
pub struct ThumbState {
    current: Option<String>,
    bytes: Option<u64>,
}

impl ThumbState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes the identifier from a snapshot. Returns true when it differs
    /// from the one on display, meaning a fetch is due.
    pub fn observe(&mut self, id: &str) -> bool {
        if self.current.as_deref() == Some(id) {
            return false;
        }
        self.current = Some(id.to_string());
        self.bytes = None;
        true
    }

    /// Records the fetched size, unless the display has moved on to another
    /// identifier in the meantime.
    pub fn record_fetched(&mut self, id: &str, len: u64) {
        if self.current.as_deref() == Some(id) {
            self.bytes = Some(len);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn bytes(&self) -> Option<u64> {
        self.bytes
    }
}

/// The modal filter input over the remaining view.
///
/// While `active`, every keystroke belongs to the input; the pause/stop
/// shortcuts must not fire. The applied needle is stored lowercased and
/// only narrows the displayed list, never the buffered collection.
#[derive(Debug, Clone, Default)]
pub struct FilterInput {
    pub active: bool,
    pub buffer: String,
    applied: Option<String>,
}

impl FilterInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.active = true;
        self.buffer.clear();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.buffer.clear();
    }

    /// Commits the buffer. An empty buffer clears the filter.
    pub fn commit(&mut self) {
        self.applied =
            if self.buffer.is_empty() { None } else { Some(self.buffer.to_lowercase()) };
        self.active = false;
        self.buffer.clear();
    }

    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Case-insensitive substring match against the applied needle. Always
    /// true while no filter is applied.
    pub fn matches(&self, name: &str) -> bool {
        match &self.applied {
            Some(needle) => name.to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// Severity of the transient notice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// A transient out-of-band message with an expiry, the toast equivalent.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

/// The whole session state, owned by the reconciliation loop.
///
/// Everything the terminal renders is a projection of this struct; no state
/// is ever read back from the rendering surface. Reconciliation steps and
/// key handling mutate it; `ui::draw` only looks.
pub struct DashState {
    /// The job this session is attached to.
    pub job_id: Uuid,
    /// Forward-only connection lifecycle.
    pub phase: StreamPhase,
    /// Verbatim stage label from the producer.
    pub stage: String,
    /// Headline `progress/total` counter.
    pub counter: String,
    /// Formatted `scanned / total` byte line.
    pub bytes_line: String,
    pub speed_line: String,
    /// ETA as `HH:MM:SS` from a zero epoch.
    pub eta_line: String,
    /// Projected local completion time for the ETA.
    pub eta_wall: String,
    pub dup_bytes_line: String,
    pub group_count: u64,
    pub largest_group: u64,
    /// cpu / mem / free-disk line.
    pub sys_line: String,
    /// Overall job progress. Only updated while the producer reports a
    /// nonzero total.
    pub overall: BarState,
    /// Per-file hashing progress.
    pub file: BarState,
    pub current_file: String,
    pub thumb: ThumbState,
    pub scanned: ScannedList,
    pub remaining: RemainingView,
    pub dupes: DupPanel,
    pub controls: ControlPanel,
    /// Set on terminal close; the footer then shows the results location.
    pub results_available: bool,
    /// Where the server publishes the finished report.
    pub results_url: String,
    pub filter: FilterInput,
    pub notice: Option<Notice>,
    /// Session counters, shared with the reader task.
    pub metrics: Metrics,
    notice_ttl: Duration,
}

impl DashState {
    pub fn new(job_id: Uuid, metrics: Metrics, notice_ttl: Duration) -> Self {
        Self {
            job_id,
            phase: StreamPhase::Connecting,
            stage: String::new(),
            counter: "0/0".to_string(),
            bytes_line: String::new(),
            speed_line: String::new(),
            eta_line: String::new(),
            eta_wall: String::new(),
            dup_bytes_line: String::new(),
            group_count: 0,
            largest_group: 0,
            sys_line: String::new(),
            overall: BarState::new(),
            file: BarState::new(),
            current_file: String::new(),
            thumb: ThumbState::new(),
            scanned: ScannedList::new(),
            remaining: RemainingView::new(),
            dupes: DupPanel::new(),
            controls: ControlPanel::new(),
            results_available: false,
            results_url: String::new(),
            filter: FilterInput::new(),
            notice: None,
            metrics,
            notice_ttl,
        }
    }

    /// True once the phase reached `Closed`, for any reason.
    pub fn is_closed(&self) -> bool {
        matches!(self.phase, StreamPhase::Closed(_))
    }

    /// True when the job itself ended (not a mere transport drop).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            StreamPhase::Closed(CloseReason::Finished) | StreamPhase::Closed(CloseReason::Stopped)
        )
    }

    /// Enters the terminal close: controls off for good, results revealed.
    pub fn mark_terminal(&mut self, finished: bool) {
        self.phase = StreamPhase::Closed(if finished {
            CloseReason::Finished
        } else {
            CloseReason::Stopped
        });
        self.controls.disable_all();
        self.results_available = true;
    }

    /// Enters the transport close: last rendered state stays, controls stay
    /// usable.
    pub fn mark_transport_closed(&mut self) {
        self.phase = StreamPhase::Closed(CloseReason::Transport);
    }

    pub fn set_notice(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            expires_at: Instant::now() + self.notice_ttl,
        });
    }

    /// Drops the notice once its time is up.
    pub fn prune_notice(&mut self, now: Instant) {
        if let Some(n) = &self.notice {
            if now >= n.expires_at {
                self.notice = None;
            }
        }
    }
}
