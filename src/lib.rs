//! Terminal browser for an education platform's category catalogue.
//!
//! The tree engine in [`tree`] is independent of the terminal front-end:
//! it builds presentation nodes from API records, filters them by search
//! term and tracks expand/collapse state. [`app`] owns the view state that
//! ties the engine to the HTTP client in [`api`].

pub mod api;
pub mod app;
pub mod config;
pub mod tree;
pub mod ui;
pub mod util;
