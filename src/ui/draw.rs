//! Dashboard screen.
//!
//! Pure projection: this module reads `DashState` and paints widgets, it
//! never mutates anything. All decisions about what a snapshot means were
//! made before the frame is drawn.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::fmt;
use crate::metrics::MetricsSnapshot;
use crate::state::{CloseReason, DashState, NoticeLevel, PauseLook, StreamPhase};
use crate::types::SortKey;

pub fn draw(f: &mut Frame, state: &DashState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: job + phase + stage
            Constraint::Length(6), // Stats
            Constraint::Length(3), // Overall bar
            Constraint::Length(3), // File bar
            Constraint::Length(3), // Current file + thumbnail
            Constraint::Min(8),    // Lists
            Constraint::Length(4), // Shortcuts + notice
        ])
        .split(f.area());

    render_header(f, chunks[0], state);
    render_stats(f, chunks[1], state);
    render_bar(f, chunks[2], "OVERALL", &state.overall, state);
    render_bar(f, chunks[3], "CURRENT FILE", &state.file, state);
    render_current(f, chunks[4], state);
    render_lists(f, chunks[5], state);
    render_footer(f, chunks[6], state);
}

fn phase_span(state: &DashState) -> Span<'static> {
    match state.phase {
        StreamPhase::Connecting => {
            Span::styled("CONNECTING", Style::default().fg(Color::Yellow))
        }
        StreamPhase::Streaming => Span::styled(
            "STREAMING",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        StreamPhase::Closed(CloseReason::Finished) => {
            Span::styled("CLOSED (finished)", Style::default().fg(Color::DarkGray))
        }
        StreamPhase::Closed(CloseReason::Stopped) => {
            Span::styled("CLOSED (stopped)", Style::default().fg(Color::DarkGray))
        }
        StreamPhase::Closed(CloseReason::Transport) => {
            Span::styled("CLOSED (connection lost)", Style::default().fg(Color::Red))
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &DashState) {
    let stage = if state.stage.is_empty() { "waiting for first snapshot" } else { &state.stage };
    let line = Line::from(vec![
        Span::styled(format!("Job {}", state.job_id), Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        phase_span(state),
        Span::raw("   "),
        Span::styled(stage.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    let header = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title("SCANWARTE"));
    f.render_widget(header, area);
}

fn render_stats(f: &mut Frame, area: Rect, state: &DashState) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White);
    let lines = vec![
        Line::from(vec![
            Span::styled("Files: ", label),
            Span::styled(state.counter.clone(), value),
            Span::styled("    Bytes: ", label),
            Span::styled(state.bytes_line.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Speed: ", label),
            Span::styled(state.speed_line.clone(), value),
            Span::styled("    ETA: ", label),
            Span::styled(state.eta_line.clone(), value),
            Span::styled(
                if state.eta_wall.is_empty() {
                    String::new()
                } else {
                    format!("  (~{})", state.eta_wall)
                },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("Duplicates: ", label),
            Span::styled(state.dup_bytes_line.clone(), value),
            Span::styled("    Groups: ", label),
            Span::styled(state.group_count.to_string(), value),
            Span::styled("    Largest: ", label),
            Span::styled(state.largest_group.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("cpu / mem / free: ", label),
            Span::styled(state.sys_line.clone(), value),
        ]),
    ];
    let stats =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("PROGRESS"));
    f.render_widget(stats, area);
}

/// Bars keep their last fill after close; only the color goes neutral.
fn render_bar(
    f: &mut Frame,
    area: Rect,
    title: &str,
    bar: &crate::state::BarState,
    state: &DashState,
) {
    let style = if state.is_terminal() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .gauge_style(style)
        .ratio(bar.ratio())
        .label(bar.label().to_string());
    f.render_widget(gauge, area);
}

fn render_current(f: &mut Frame, area: Rect, state: &DashState) {
    let mut spans = vec![Span::styled(
        state.current_file.clone(),
        Style::default().fg(Color::White),
    )];
    if let Some(id) = state.thumb.current() {
        let detail = match state.thumb.bytes() {
            Some(len) => format!("   [thumb {} {}]", id, fmt::format_bytes(len)),
            None => format!("   [thumb {} loading]", id),
        };
        spans.push(Span::styled(detail, Style::default().fg(Color::DarkGray)));
    }
    let current = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("CURRENT FILE"));
    f.render_widget(current, area);
}

fn render_lists(f: &mut Frame, area: Rect, state: &DashState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_scanned(f, columns[0], state);
    render_remaining(f, columns[1], state);
    render_dupes(f, columns[2], state);
}

/// The scanned column shows the tail of the append-only list; the count in
/// the title keeps the full total visible.
fn render_scanned(f: &mut Frame, area: Rect, state: &DashState) {
    let height = area.height.saturating_sub(2) as usize;
    let items = state.scanned.items();
    let tail = &items[items.len().saturating_sub(height)..];
    let rows: Vec<ListItem> = tail.iter().map(|name| ListItem::new(name.clone())).collect();
    let list = List::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("SCANNED ({})", state.scanned.len())),
    );
    f.render_widget(list, area);
}

fn render_remaining(f: &mut Frame, area: Rect, state: &DashState) {
    let shown: Vec<ListItem> = state
        .remaining
        .entries()
        .iter()
        .filter(|e| state.filter.matches(&e.name))
        .map(|e| {
            ListItem::new(Line::from(vec![
                Span::raw(e.name.clone()),
                Span::styled(
                    format!("  {}", fmt::format_bytes(e.size)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let sort = match state.remaining.sort() {
        SortKey::Name => "name",
        SortKey::Size => "size",
    };
    let title = match state.filter.applied() {
        Some(needle) => format!(
            "REMAINING ({}/{}) sort:{} filter:{}",
            shown.len(),
            state.remaining.len(),
            sort,
            needle
        ),
        None => format!("REMAINING ({}) sort:{}", state.remaining.len(), sort),
    };
    let list = List::new(shown).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn render_dupes(f: &mut Frame, area: Rect, state: &DashState) {
    let rows: Vec<ListItem> = state
        .dupes
        .rows()
        .iter()
        .map(|row| ListItem::new(row.label.clone()))
        .collect();
    let list = List::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("DUPLICATE GROUPS ({})", state.dupes.len())),
    );
    f.render_widget(list, area);
}

/// The idle info line: all session counters at a glance.
pub fn metrics_line(m: &MetricsSnapshot) -> String {
    format!(
        "snapshots {} applied, {} dropped • {} controls sent • {} thumbs fetched",
        m.snapshots_applied, m.snapshots_dropped, m.controls_sent, m.thumbnails_fetched
    )
}

fn render_footer(f: &mut Frame, area: Rect, state: &DashState) {
    let status_line = if state.filter.active {
        Line::from(Span::styled(
            format!("Filter: {}▏  Enter apply, Esc cancel", state.filter.buffer),
            Style::default().fg(Color::Cyan),
        ))
    } else {
        let pause_hint = match (state.controls.pause_enabled(), state.controls.pause_look()) {
            (false, _) => Span::styled("Space -", Style::default().fg(Color::DarkGray)),
            (true, PauseLook::Running) => Span::raw("Space pause"),
            (true, PauseLook::Paused) => Span::styled(
                "Space resume",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        };
        let stop_hint = if state.controls.stop_enabled() {
            Span::raw("s stop")
        } else {
            Span::styled("s -", Style::default().fg(Color::DarkGray))
        };
        let sep = Span::styled(" • ", Style::default().fg(Color::DarkGray));
        Line::from(vec![
            pause_hint,
            sep.clone(),
            stop_hint,
            sep.clone(),
            Span::raw("n/z sort"),
            sep.clone(),
            Span::raw("/ filter"),
            sep,
            Span::raw("q quit"),
        ])
    };

    let info_line = if let Some(notice) = &state.notice {
        let style = match notice.level {
            NoticeLevel::Info => Style::default().fg(Color::Gray),
            NoticeLevel::Warn => {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            }
        };
        Line::from(Span::styled(notice.text.clone(), style))
    } else if state.results_available {
        Line::from(Span::styled(
            format!("Results: {}", state.results_url),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            metrics_line(&state.metrics.get_snapshot()),
            Style::default().fg(Color::DarkGray),
        ))
    };

    let footer = Paragraph::new(vec![status_line, info_line])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("STATUS"));
    f.render_widget(footer, area);
}
