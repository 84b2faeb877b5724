//! Terminal User Interface module.
//!
//! This module provides the TUI for browsing the category tree:
//! - Main event loop (`run`)
//! - Input handling for browse and search modes
//! - Rendering of the tree, stats header, search bar and status bar
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and view dispatch
//! - `tree_panel` - Category tree widget
//! - `status` - Status bar widget
//! - `help` - Key reference overlay
//! - `plain` - Plain-text tree output for non-interactive use

mod events;
mod help;
mod input;
mod loop_runner;
mod plain;
mod render;
mod status;
mod tree_panel;

pub use loop_runner::{run, Action};
pub use plain::{plain_lines, plain_report};
