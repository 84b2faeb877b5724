//! Plain-text rendering of the tree for `--print`.

use crate::app::{CategoryTreeView, EmptyState};
use crate::tree::TreeNode;

/// Everything `--print` writes to stdout for `view`.
///
/// An empty catalogue and a search without matches get distinct messages,
/// checked in that order, the same way the tree panel decides.
pub fn plain_report(view: &CategoryTreeView) -> Vec<String> {
    if let Some(empty) = view.empty_state() {
        let message = match empty {
            EmptyState::Loading => "Loading categories...".to_string(),
            EmptyState::LoadFailed(error) => format!("Failed to load categories: {}", error),
            EmptyState::NoCategories => "No categories yet".to_string(),
            EmptyState::NoMatches(term) => format!("No categories match \"{}\"", term),
        };
        return vec![message];
    }

    let mut out = plain_lines(view.working_tree());
    let stats = view.stats();
    out.push(String::new());
    out.push(format!(
        "Total: {}  Active: {}  Inactive: {}",
        stats.total, stats.active, stats.inactive
    ));
    out
}

/// One line per visible node, indented two spaces per level.
///
/// Unlike the interactive panel this ignores `expanded`: every node that is
/// not hidden is listed. Inactive categories are marked.
pub fn plain_lines(nodes: &[TreeNode]) -> Vec<String> {
    fn walk(nodes: &[TreeNode], depth: usize, out: &mut Vec<String>) {
        for node in nodes.iter().filter(|n| !n.hidden) {
            let mut line = format!("{}- {}", "  ".repeat(depth), node.name);
            if !node.slug.is_empty() {
                line.push_str(&format!(" ({})", node.slug));
            }
            if !node.is_active {
                line.push_str(" [inactive]");
            }
            out.push(line);
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}
