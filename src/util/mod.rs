//! Utility functions shared by the client, tree engine and UI.
//!
//! - **Base URL validation**: HTTPS enforcement for the platform API
//! - **Text processing**: control character stripping and width-aware truncation

mod base_url;
mod text;

pub use base_url::{validate_base_url, BaseUrlError};
pub use text::{display_width, strip_control_chars, truncate_to_width};

/// Maximum accepted search term length in the UI.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;
