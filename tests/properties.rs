//! Property tests for insertion, gap discovery and validation

mod common;
use common::p;

use std::collections::BTreeSet;

use pathtree::{InsertError, InsertOutcome, PathTree, TreePath, Walk};
use proptest::prelude::*;

fn path_text() -> impl Strategy<Value = String> {
    "[01]{1,8}"
}

fn records() -> impl Strategy<Value = Vec<(i64, String)>> {
    proptest::collection::vec((-50i64..50, path_text()), 1..24)
}

fn build(records: &[(i64, String)]) -> PathTree {
    let mut tree = PathTree::new();
    for (value, path) in records {
        let _ = tree.insert(*value, &p(path));
    }
    tree
}

/// Brute force: every strict prefix of every known path, checked node by node
fn missing_by_brute_force(tree: &PathTree) -> BTreeSet<TreePath> {
    let mut missing = BTreeSet::new();
    for path in tree.known_paths() {
        let text = path.to_string();
        for len in 1..text.len() {
            let prefix = p(&text[..len]);
            if tree.value_at(&prefix).is_none() {
                missing.insert(prefix);
            }
        }
    }
    missing
}

proptest! {
    #[test]
    fn known_paths_are_prefix_closed(records in records()) {
        let tree = build(&records);

        for (_, path) in &records {
            for len in 1..=path.len() {
                prop_assert!(tree.known_paths().contains(&p(&path[..len])));
            }
        }
        for path in tree.known_paths() {
            for ancestor in path.ancestors() {
                prop_assert!(tree.known_paths().contains(&ancestor));
            }
        }
    }

    #[test]
    fn reinserting_same_value_is_idempotent(records in records()) {
        let mut tree = build(&records);
        let shape_before: Vec<(String, Option<i64>)> = Walk::new(tree.root())
            .map(|(path, node)| (path.to_string(), node.value()))
            .collect();
        let conflicts_before = tree.conflicts().len();

        for (_, path) in &records {
            let path = p(path);
            let value = tree.value_at(&path).expect("inserted path has a value");
            prop_assert_eq!(tree.insert(value, &path), Ok(InsertOutcome::Unchanged));
        }

        let shape_after: Vec<(String, Option<i64>)> = Walk::new(tree.root())
            .map(|(path, node)| (path.to_string(), node.value()))
            .collect();
        prop_assert_eq!(shape_before, shape_after);
        prop_assert_eq!(tree.conflicts().len(), conflicts_before);
    }

    #[test]
    fn different_value_conflicts_and_preserves(records in records(), delta in 1i64..10) {
        let mut tree = build(&records);
        let (_, path) = &records[0];
        let path = p(path);
        let existing = tree.value_at(&path).expect("inserted path has a value");
        let conflicts_before = tree.conflicts().len();

        let result = tree.insert(existing + delta, &path);
        prop_assert_eq!(
            result,
            Err(InsertError::Conflict { path: path.clone(), value: existing + delta, existing })
        );
        prop_assert_eq!(tree.value_at(&path), Some(existing));
        prop_assert_eq!(tree.conflicts().len(), conflicts_before + 1);
    }

    #[test]
    fn missing_matches_brute_force(records in records()) {
        let mut tree = build(&records);
        let expected = missing_by_brute_force(&tree);
        prop_assert_eq!(tree.find_missing_ancestors(), &expected);
    }

    #[test]
    fn filling_gaps_clears_them(records in records(), fill in -5i64..5) {
        let mut tree = build(&records);
        let missing: Vec<TreePath> = tree.find_missing_ancestors().iter().cloned().collect();

        for path in &missing {
            prop_assert_eq!(tree.insert(fill, path), Ok(InsertOutcome::Assigned));
            prop_assert!(!tree.find_missing_ancestors().contains(path));
        }

        prop_assert!(tree.find_missing_ancestors().is_empty());
        prop_assert!(tree.validate().is_clean());
    }

    #[test]
    fn validate_is_clean_iff_no_gaps(records in records()) {
        let mut tree = build(&records);
        let gaps = !tree.find_missing_ancestors().is_empty();
        let unvalued = tree.known_paths().iter().any(|path| tree.value_at(path).is_none());

        prop_assert_eq!(tree.validate().is_clean(), !gaps && !unvalued);
    }
}
