//! Source positions and stable handles back into a parse tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn from_ts_node(node: &tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: Position {
                line: start.row as u32,
                column: start.column as u32,
            },
            end: Position {
                line: end.row as u32,
                column: end.column as u32,
            },
        }
    }
}

/// Locates a declaration node inside the `CompilationUnit` it came from.
///
/// Nodes borrow their tree, so inventories keep this handle instead and
/// re-acquire the node through `CompilationUnit::node_for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AstHandle {
    pub start_byte: usize,
    pub end_byte: usize,
    pub range: Range,
}

impl AstHandle {
    pub fn from_node(node: &tree_sitter::Node) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            range: Range::from_ts_node(node),
        }
    }
}
