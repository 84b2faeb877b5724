use chrono::{DateTime, Utc};

use super::TreeNode;
use crate::api::CategoryRecord;
use crate::util::strip_control_chars;

/// Icon token used when the server sends none.
pub const FALLBACK_ICON: &str = "folder";

/// Nodes at a depth below this start expanded. 1 = only the roots.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

/// Knobs for [`build_with`].
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Nodes with `depth < expand_depth` start expanded.
    pub expand_depth: usize,
    /// Timestamp given to records without a parsable `createdAt`.
    pub now: DateTime<Utc>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            expand_depth: DEFAULT_EXPAND_DEPTH,
            now: Utc::now(),
        }
    }
}

/// Build presentation nodes from API records with default options.
///
/// `depth` is the depth of `records` within the whole tree; callers pass 0.
pub fn build(records: &[CategoryRecord], depth: usize) -> Vec<TreeNode> {
    build_with(records, depth, &BuildOptions::default())
}

/// Build presentation nodes from API records.
///
/// Depth-first and pre-order. The output mirrors the input exactly: same
/// length and order at every level. Malformed records are never rejected,
/// their missing fields are defaulted instead.
///
/// Recursion follows the natural depth of the input with no limit, so a
/// pathologically deep payload can exhaust the stack. Category hierarchies
/// are a handful of levels deep in practice.
pub fn build_with(records: &[CategoryRecord], depth: usize, opts: &BuildOptions) -> Vec<TreeNode> {
    records
        .iter()
        .map(|record| build_node(record, depth, opts))
        .collect()
}

fn build_node(record: &CategoryRecord, depth: usize, opts: &BuildOptions) -> TreeNode {
    if record.id.is_none() {
        tracing::debug!(depth, name = ?record.name, "Category record without id");
    }

    let icon = match record.icon.as_deref().map(str::trim) {
        Some(icon) if !icon.is_empty() => clean(Some(icon)),
        _ => FALLBACK_ICON.to_string(),
    };

    TreeNode {
        id: record.id.clone().unwrap_or_default(),
        name: clean(record.name.as_deref()),
        slug: clean(record.slug.as_deref()),
        description: clean(record.description.as_deref()),
        icon,
        image: clean(record.image.as_deref()),
        is_active: record.is_active.unwrap_or(true),
        created_at: parse_created_at(record.created_at.as_deref()).unwrap_or(opts.now),
        expanded: depth < opts.expand_depth,
        hidden: false,
        children: build_with(&record.children, depth + 1, opts),
    }
}

/// Names come from a remote server and end up on a terminal.
fn clean(value: Option<&str>) -> String {
    value
        .map(|v| strip_control_chars(v).into_owned())
        .unwrap_or_default()
}

fn parse_created_at(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = %raw, error = %e, "Unparsable createdAt, using build time");
            None
        }
    }
}
