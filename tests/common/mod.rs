#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pathtree::{PathTree, TreePath};

const UPDATE_VAR: &str = "PATHTREE_UPDATE_SNAPSHOTS";

/// Golden files live under `tests/snapshots/`
fn golden_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/snapshots")
        .join(name)
}

/// Compare rendered text against a golden file, line by line
///
/// With `PATHTREE_UPDATE_SNAPSHOTS` set the golden file is rewritten instead.
/// Line endings are ignored so checkouts with CRLF still pass.
pub fn assert_snapshot(name: &str, actual: &str) {
    let golden = golden_path(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        if let Some(dir) = golden.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(&golden, actual).unwrap();
        return;
    }

    let expected = fs::read_to_string(&golden)
        .unwrap_or_else(|err| panic!("cannot read golden file {}: {err}", golden.display()));
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    if expected == actual {
        return;
    }

    let first_diff = expected
        .iter()
        .zip(&actual)
        .position(|(want, got)| want != got)
        .unwrap_or(expected.len().min(actual.len()));
    panic!(
        "{} differs from rendering at line {} (rerun with {UPDATE_VAR}=1 to accept)\n\
         --- golden\n{}\n--- rendered\n{}",
        golden.display(),
        first_diff + 1,
        expected.join("\n"),
        actual.join("\n"),
    );
}

/// Parse a path literal
pub fn p(text: &str) -> TreePath {
    text.parse().expect("valid path literal")
}

/// Tree built from `(value, path)` pairs; conflicts are ignored
pub fn tree_from(records: &[(i64, &str)]) -> PathTree {
    let mut tree = PathTree::new();
    for &(value, path) in records {
        let _ = tree.insert(value, &p(path));
    }
    tree
}

/// Render paths as strings, preserving order
pub fn strings<'a>(paths: impl IntoIterator<Item = &'a TreePath>) -> Vec<String> {
    paths.into_iter().map(ToString::to_string).collect()
}
