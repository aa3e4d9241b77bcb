//! Test module for typeahead-core
//!
//! This module contains tests for:
//! - Debounced resolution and the live-input read at fire time
//! - Query cache behaviour through the widget (local and remote)
//! - Category grouping, highlighting and custom formatting
//! - Menu open/close transitions for focus, blur, typing and selection
//! - Remote fetch completion, stale responses, failures and timeouts
//! - Configuration parsing and loading

mod presenter_tests;
