//! Integration and unit tests for the Scanwarte application.
//!
//! This module organizes all test modules for the application, providing
//! comprehensive test coverage for different components and functionality.
//!
//! ## Test Modules
//!
//! - **cli_tests**: Command line parsing
//! - **draw_tests**: Renderable projections of the session state
//! - **fmt_tests**: Display formatting (bytes, rates, durations)
//! - **state_tests**: Session state containers and their invariants
//! - **reconcile_tests**: Snapshot-to-state reconciliation and effects
//! - **types_tests**: Wire format decoding
//! - **config_tests**: Configuration loading and validation tests
//! - **keys_tests**: Keyboard shortcut handling and the input guard
//! - **stream_tests**: Stream reader, controls and thumbnails against an
//!   in-process server
//!
//! ## Running Tests
//!
//! Tests can be run using:
//! ```bash
//! cargo test
//! ```
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test fmt_tests
//! cargo test reconcile_tests
//! # etc.
//! ```

pub mod keys_tests;
pub mod stream_tests;
