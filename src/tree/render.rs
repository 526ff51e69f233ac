//! Sideways tree rendering
//!
//! Right subtrees are drawn above their parent, left subtrees below,
//! so the picture reads like the tree rotated a quarter turn.

use std::fmt;

use super::{Direction, Node};

/// Display adapter drawing a subtree sideways
#[derive(Debug, Clone, Copy)]
pub struct Sideways<'a> {
    root: &'a Node,
}

impl<'a> Sideways<'a> {
    /// Render everything below (and including) `root`
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }
}

fn draw(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    prefix: &str,
    is_left: bool,
) -> fmt::Result {
    if let Some(right) = node.child(Direction::Right) {
        let extension = if is_left { "│   " } else { "    " };
        draw(f, right, &format!("{prefix}{extension}"), false)?;
    }

    let connector = if is_left { "└── " } else { "┌── " };
    writeln!(f, "{prefix}{connector}{node}")?;

    if let Some(left) = node.child(Direction::Left) {
        let extension = if is_left { "    " } else { "│   " };
        draw(f, left, &format!("{prefix}{extension}"), true)?;
    }

    Ok(())
}

impl fmt::Display for Sideways<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        draw(f, self.root, "", true)
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::PathTree;

    #[test]
    fn test_root_only() {
        let tree = PathTree::new();
        assert_eq!(tree.sideways().to_string(), "└── 0\n");
    }

    #[test]
    fn test_structural_nodes_render_as_placeholder() {
        let mut tree = PathTree::new();
        tree.insert_str(4, "00").unwrap();
        assert_eq!(
            tree.sideways().to_string(),
            "└── 0\n    └── ?\n        └── 4\n"
        );
    }
}
