//! # Scanwarte Library
//!
//! This is the core library for Scanwarte, a terminal dashboard that attaches
//! to a running video scan and dedup job and mirrors its progress live.
//! Scanwarte consumes the server's snapshot stream, reconciles each snapshot
//! into a session state and projects that state onto the terminal.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Reqwest**: HTTP client for the snapshot stream, controls and thumbnails
//! - **Ratatui**: Terminal rendering on top of crossterm
//! - **Tokio**: Async runtime multiplexing stream, keyboard and ticks
//! - **Serde**: Deserialization of the snapshot wire format
//!
//! ## Core Components
//!
//! - [`cli`]: Command line parsing
//! - [`config`]: Application configuration management
//! - [`client`]: Snapshot stream subscription, job controls and thumbnail fetches
//! - [`error`]: Centralized error handling
//! - [`fmt`]: Display formatting for bytes, rates and durations
//! - [`metrics`]: Session counters
//! - [`reconcile`]: Ordered snapshot-to-state reconciliation with effects
//! - [`state`]: The session state the terminal renders
//! - [`types`]: Wire format and shared type definitions
//! - [`ui`]: Terminal lifecycle, drawing and keyboard handling
//! - [`app`]: The event loop
//!
//! ## Features
//!
//! - Live snapshot consumption via Server-Sent Events (SSE)
//! - Append-only scanned list with wholesale resync on contract violations
//! - Sortable and filterable remaining-files view
//! - Insert-once duplicate group panel
//! - Pause, resume and stop controls with server-confirmed state
//! - Sticky terminal close with results affordance
//! - Structured logging to rotating files, clear of the terminal UI

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fmt;
pub mod metrics;
pub mod reconcile;
pub mod state;
pub mod types;
pub mod ui;

#[cfg(test)]
mod tests;
