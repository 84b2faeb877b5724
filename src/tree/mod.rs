//! Category tree engine.
//!
//! - `builder` turns API records into presentation nodes
//! - `filter` applies a search term, propagating visibility to ancestors
//! - `state` holds expand/collapse mutators, flattening and stats
//!
//! The tree is a plain owned structure: every node owns its children and
//! there are no back-references, so `Clone` is a full structural copy. The
//! view keeps one canonical copy and mutates a second, independent one.

mod builder;
mod filter;
mod state;

use chrono::{DateTime, Utc};

pub use builder::{build, build_with, BuildOptions, DEFAULT_EXPAND_DEPTH, FALLBACK_ICON};
pub use filter::{filter, reset_hidden};
pub use state::{
    collapse_all, compute_stats, count_nodes, expand_all, find_node_mut, node_at_path_mut,
    toggle_node, visible_rows, CategoryStats, VisibleRow,
};

/// Presentation node derived from a [`CategoryRecord`](crate::api::CategoryRecord).
///
/// Display fields are never absent: missing upstream values become empty
/// strings (or [`FALLBACK_ICON`] for the icon). `expanded` and `hidden` are
/// UI state and only meaningful on the working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub expanded: bool,
    pub hidden: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
