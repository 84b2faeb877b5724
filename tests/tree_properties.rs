//! Property-based tests for the tree engine.
//!
//! 1. Building preserves the input shape at every level
//! 2. Initial expansion depends only on depth
//! 3. Stats are additive: active + inactive == total == node count
//! 4. Filtering with an empty term resets visibility and is idempotent
//! 5. A matching node keeps every ancestor visible and expanded
//! 6. A term nothing contains hides everything
//! 7. Expand all / collapse all reach every node with children

use chrono::{TimeZone, Utc};
use edutree::api::CategoryRecord;
use edutree::tree::{self, BuildOptions, TreeNode};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn leaf_strategy() -> impl Strategy<Value = CategoryRecord> {
    (
        "[a-z]{1,6}",
        proptest::option::of("[a-z]{1,8}"),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(name, slug, active)| CategoryRecord {
            id: Some(format!("id-{}", name)),
            name: Some(name),
            slug,
            is_active: active,
            ..CategoryRecord::default()
        })
}

fn record_strategy() -> impl Strategy<Value = CategoryRecord> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        (leaf_strategy(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
            node.children = children;
            node
        })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<CategoryRecord>> {
    prop::collection::vec(record_strategy(), 0..5)
}

fn opts(expand_depth: usize) -> BuildOptions {
    BuildOptions {
        expand_depth,
        now: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn same_shape(records: &[CategoryRecord], nodes: &[TreeNode]) -> bool {
    records.len() == nodes.len()
        && records.iter().zip(nodes).all(|(r, n)| {
            r.id.as_deref().unwrap_or_default() == n.id && same_shape(&r.children, &n.children)
        })
}

fn check_expansion(nodes: &[TreeNode], depth: usize, expand_depth: usize) -> bool {
    nodes.iter().all(|n| {
        n.expanded == (depth < expand_depth) && check_expansion(&n.children, depth + 1, expand_depth)
    })
}

fn all_visible(nodes: &[TreeNode]) -> bool {
    nodes.iter().all(|n| !n.hidden && all_visible(&n.children))
}

/// Every node with children has `expanded == want`; leaves keep their flag from `before`.
fn parents_expanded(nodes: &[TreeNode], want: bool, before: &[TreeNode]) -> bool {
    nodes.iter().zip(before).all(|(n, b)| {
        let ok = if n.has_children() {
            n.expanded == want
        } else {
            n.expanded == b.expanded
        };
        ok && parents_expanded(&n.children, want, &b.children)
    })
}

fn all_hidden(nodes: &[TreeNode]) -> bool {
    nodes.iter().all(|n| n.hidden && all_hidden(&n.children))
}

/// Every node whose name contains `needle` must have a visible, expanded
/// chain of ancestors.
fn ancestors_visible(nodes: &[TreeNode], needle: &str) -> bool {
    nodes.iter().all(|n| {
        let descendant_matches = subtree_contains(&n.children, needle);
        let ok = if descendant_matches {
            !n.hidden && n.expanded
        } else {
            true
        };
        ok && ancestors_visible(&n.children, needle)
    })
}

fn subtree_contains(nodes: &[TreeNode], needle: &str) -> bool {
    nodes
        .iter()
        .any(|n| n.name.contains(needle) || subtree_contains(&n.children, needle))
}

// ═══════════════════════════════════════════════════════════════════════
// Build
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn build_preserves_shape(records in forest_strategy()) {
        let nodes = tree::build_with(&records, 0, &opts(1));
        prop_assert!(same_shape(&records, &nodes));
        prop_assert!(all_visible(&nodes));
    }

    #[test]
    fn initial_expansion_follows_depth(records in forest_strategy(), expand_depth in 0usize..4) {
        let nodes = tree::build_with(&records, 0, &opts(expand_depth));
        prop_assert!(check_expansion(&nodes, 0, expand_depth));
    }

    #[test]
    fn stats_are_additive(records in forest_strategy()) {
        let stats = tree::compute_stats(&records);
        let nodes = tree::build_with(&records, 0, &opts(1));
        prop_assert_eq!(stats.active + stats.inactive, stats.total);
        prop_assert_eq!(stats.total, tree::count_nodes(&nodes));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Filter
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_term_resets_and_is_idempotent(
        records in forest_strategy(),
        term in "[a-z]{1,3}",
        blank in "[ \t]{0,3}",
    ) {
        let mut nodes = tree::build_with(&records, 0, &opts(1));
        tree::filter(&mut nodes, &term);

        let first = tree::filter(&mut nodes, &blank);
        prop_assert!(all_visible(&nodes));
        let snapshot = nodes.clone();

        let second = tree::filter(&mut nodes, &blank);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, !records.is_empty());
        prop_assert_eq!(snapshot, nodes);
    }

    #[test]
    fn matches_keep_ancestors_open(records in forest_strategy(), needle in "[a-z]{1,2}") {
        let mut nodes = tree::build_with(&records, 0, &opts(0));
        let any = tree::filter(&mut nodes, &needle);
        prop_assert!(ancestors_visible(&nodes, &needle));
        if subtree_contains(&nodes, &needle) {
            prop_assert!(any);
        }
    }

    #[test]
    fn unmatched_term_hides_everything(records in forest_strategy()) {
        let mut nodes = tree::build_with(&records, 0, &opts(1));
        // Generated names, slugs and ids only use lowercase ASCII letters.
        prop_assert!(!tree::filter(&mut nodes, "0#0"));
        prop_assert!(all_hidden(&nodes));
        prop_assert!(tree::visible_rows(&nodes).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Expand / collapse
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn expand_and_collapse_all_reach_every_parent(
        records in forest_strategy(),
        expand_depth in 0usize..4,
    ) {
        let mut nodes = tree::build_with(&records, 0, &opts(expand_depth));
        let before = nodes.clone();

        tree::expand_all(&mut nodes);
        prop_assert!(parents_expanded(&nodes, true, &before));
        prop_assert!(same_shape(&records, &nodes));

        tree::collapse_all(&mut nodes);
        prop_assert!(parents_expanded(&nodes, false, &before));
        prop_assert_eq!(tree::visible_rows(&nodes).len(), nodes.len());
    }
}
