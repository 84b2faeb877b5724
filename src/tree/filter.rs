use super::TreeNode;

/// Apply a search term to `nodes` in place.
///
/// A node stays visible when its name, slug or description contains the
/// term (case-insensitive), or when any descendant does. Ancestors kept
/// visible only by a descendant are force-expanded so the match can be
/// reached; a node that matches on its own keeps its `expanded` flag.
///
/// An empty or whitespace-only term clears every `hidden` flag instead.
///
/// Returns whether at least one node of `nodes` is visible.
pub fn filter(nodes: &mut [TreeNode], term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        reset_hidden(nodes);
        return !nodes.is_empty();
    }

    let needle = term.to_lowercase();
    filter_level(nodes, &needle)
}

/// Clear `hidden` on every node of the subtree. `expanded` is left alone.
pub fn reset_hidden(nodes: &mut [TreeNode]) {
    for node in nodes {
        node.hidden = false;
        reset_hidden(&mut node.children);
    }
}

fn filter_level(nodes: &mut [TreeNode], needle: &str) -> bool {
    let mut any_visible = false;
    for node in nodes.iter_mut() {
        let self_match = matches(node, needle);
        // Children first: every descendant needs its own flag set even when
        // this node already matches.
        let children_match = filter_level(&mut node.children, needle);

        node.hidden = !(self_match || children_match);
        if children_match {
            node.expanded = true;
        }
        any_visible |= !node.hidden;
    }
    any_visible
}

fn matches(node: &TreeNode, needle: &str) -> bool {
    [&node.name, &node.slug, &node.description]
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CategoryRecord;
    use crate::tree::build;

    fn tech_tree() -> Vec<TreeNode> {
        build(
            &[CategoryRecord::new("A", "Tech")
                .with_children(vec![CategoryRecord::new("B", "Web Dev")])],
            0,
        )
    }

    fn deep_tree() -> Vec<TreeNode> {
        build(
            &[
                CategoryRecord::new("root", "Science").with_children(vec![
                    CategoryRecord::new("mid", "Physics").with_children(vec![
                        CategoryRecord::new("leaf", "Quantum Mechanics"),
                        CategoryRecord::new("leaf2", "Optics"),
                    ]),
                    CategoryRecord::new("chem", "Chemistry"),
                ]),
                CategoryRecord::new("other", "Languages"),
            ],
            0,
        )
    }

    #[test]
    fn test_child_match_forces_parent_expanded() {
        let mut tree = tech_tree();
        tree[0].expanded = false;

        assert!(filter(&mut tree, "web"));
        assert!(!tree[0].hidden);
        assert!(tree[0].expanded);
        assert!(!tree[0].children[0].hidden);
    }

    #[test]
    fn test_no_match_hides_everything() {
        let mut tree = tech_tree();
        assert!(!filter(&mut tree, "zzz"));
        assert!(tree[0].hidden);
        assert!(tree[0].children[0].hidden);
    }

    #[test]
    fn test_deep_match_keeps_ancestor_chain() {
        let mut tree = deep_tree();
        assert!(filter(&mut tree, "QUANTUM"));

        let root = &tree[0];
        let mid = &root.children[0];
        assert!(!root.hidden && root.expanded);
        assert!(!mid.hidden && mid.expanded);
        assert!(!mid.children[0].hidden);
        assert!(mid.children[1].hidden);
        assert!(root.children[1].hidden);
        assert!(tree[1].hidden);
    }

    #[test]
    fn test_self_match_does_not_touch_expanded() {
        let mut tree = deep_tree();
        assert!(!tree[0].children[0].expanded);

        assert!(filter(&mut tree, "physics"));
        let mid = &tree[0].children[0];
        assert!(!mid.hidden);
        assert!(!mid.expanded);
        assert!(mid.children.iter().all(|c| c.hidden));
    }

    #[test]
    fn test_matches_slug_and_description() {
        let mut tree = build(
            &[
                CategoryRecord::new("1", "One").with_slug("rust-lang"),
                CategoryRecord::new("2", "Two").with_description("Intro to Algebra"),
                CategoryRecord::new("3", "Three"),
            ],
            0,
        );
        assert!(filter(&mut tree, "Rust"));
        assert_eq!(
            tree.iter().map(|n| n.hidden).collect::<Vec<_>>(),
            vec![false, true, true]
        );

        assert!(filter(&mut tree, "algebra"));
        assert_eq!(
            tree.iter().map(|n| n.hidden).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_term_is_trimmed() {
        let mut tree = tech_tree();
        assert!(filter(&mut tree, "  web  "));
        assert!(!tree[0].children[0].hidden);
    }

    #[test]
    fn test_empty_term_resets_hidden_but_keeps_expanded() {
        let mut tree = deep_tree();
        filter(&mut tree, "nothing matches this");
        filter(&mut tree, "quantum");
        let expanded_before = tree[0].children[0].expanded;

        assert!(filter(&mut tree, ""));
        fn all_visible(nodes: &[TreeNode]) -> bool {
            nodes.iter().all(|n| !n.hidden && all_visible(&n.children))
        }
        assert!(all_visible(&tree));
        assert_eq!(tree[0].children[0].expanded, expanded_before);
    }

    #[test]
    fn test_whitespace_term_is_reset() {
        let mut tree = tech_tree();
        filter(&mut tree, "zzz");
        assert!(filter(&mut tree, " \t "));
        assert!(!tree[0].hidden);
        assert!(!tree[0].children[0].hidden);
    }

    #[test]
    fn test_empty_tree() {
        let mut tree: Vec<TreeNode> = Vec::new();
        assert!(!filter(&mut tree, ""));
        assert!(!filter(&mut tree, "x"));
    }

    #[test]
    fn test_unicode_case_insensitive() {
        let mut tree = build(&[CategoryRecord::new("1", "Ökonomie")], 0);
        assert!(filter(&mut tree, "ÖKO"));
        assert!(filter(&mut tree, "öko"));
    }
}
