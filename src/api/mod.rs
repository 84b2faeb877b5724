//! Client side of the platform's category API.
//!
//! - `types` - wire format of the nested category payload
//! - `client` - reqwest-based fetcher and the [`CategorySource`] seam

mod client;
mod types;

pub use client::{ApiError, CategoryClient, CategorySource, CATEGORY_TREE_PATH, DEFAULT_TIMEOUT};
pub use types::CategoryRecord;
