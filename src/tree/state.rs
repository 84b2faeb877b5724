use super::TreeNode;
use crate::api::CategoryRecord;

/// Category counts over the source records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Count every record once, pre-order.
///
/// Operates on the source records rather than the presentation tree: the
/// records are the ground truth and are recomputed from on every reload.
/// A record is active unless it is explicitly marked `isActive: false`.
pub fn compute_stats(records: &[CategoryRecord]) -> CategoryStats {
    fn walk(records: &[CategoryRecord], stats: &mut CategoryStats) {
        for record in records {
            stats.total += 1;
            if record.is_active != Some(false) {
                stats.active += 1;
            }
            walk(&record.children, stats);
        }
    }

    let mut stats = CategoryStats::default();
    walk(records, &mut stats);
    stats.inactive = stats.total - stats.active;
    stats
}

/// Total number of nodes in the subtree.
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

/// Expand every node that has children.
pub fn expand_all(nodes: &mut [TreeNode]) {
    set_expanded(nodes, true);
}

/// Collapse every node that has children.
pub fn collapse_all(nodes: &mut [TreeNode]) {
    set_expanded(nodes, false);
}

fn set_expanded(nodes: &mut [TreeNode], expanded: bool) {
    for node in nodes {
        if node.has_children() {
            node.expanded = expanded;
            set_expanded(&mut node.children, expanded);
        }
    }
}

/// Flip `expanded` on a node with children. Leaves are left alone.
///
/// Returns whether the flag changed.
pub fn toggle_node(node: &mut TreeNode) -> bool {
    if !node.has_children() {
        return false;
    }
    node.expanded = !node.expanded;
    true
}

/// First node with the given id, pre-order.
pub fn find_node_mut<'a>(nodes: &'a mut [TreeNode], id: &str) -> Option<&'a mut TreeNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Node addressed by child indices from the top level, e.g. `[0, 2]` is the
/// third child of the first root.
pub fn node_at_path_mut<'a>(nodes: &'a mut [TreeNode], path: &[usize]) -> Option<&'a mut TreeNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_path_mut(&mut node.children, rest)
    }
}

/// One line of the rendered tree.
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
    /// Child indices from the top level down to `node`.
    pub path: Vec<usize>,
}

/// Flatten the tree in render order.
///
/// Hidden nodes are skipped together with their subtrees, and children are
/// only listed under expanded parents.
pub fn visible_rows(nodes: &[TreeNode]) -> Vec<VisibleRow<'_>> {
    fn walk<'a>(
        nodes: &'a [TreeNode],
        depth: usize,
        prefix: &mut Vec<usize>,
        out: &mut Vec<VisibleRow<'a>>,
    ) {
        for (idx, node) in nodes.iter().enumerate() {
            if node.hidden {
                continue;
            }
            prefix.push(idx);
            out.push(VisibleRow {
                node,
                depth,
                path: prefix.clone(),
            });
            if node.expanded {
                walk(&node.children, depth + 1, prefix, out);
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut Vec::new(), &mut out);
    out
}
