//! Tree-walking helpers over the tree-sitter-java grammar.

use tree_sitter::Node;

pub const METHOD_DECLARATION: &str = "method_declaration";
pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
pub const METHOD_INVOCATION: &str = "method_invocation";
pub const EXPLICIT_CONSTRUCTOR_INVOCATION: &str = "explicit_constructor_invocation";
pub const OBJECT_CREATION_EXPRESSION: &str = "object_creation_expression";

/// Type declarations whose bodies hold callables.
pub const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

/// Controls descent in `walk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    Descend,
    Skip,
}

/// Pre-order walk over `node` and its descendants, in source order.
pub fn walk<'t>(node: Node<'t>, mut visit: impl FnMut(Node<'t>) -> WalkAction) {
    let mut cursor = node.walk();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if visit(current) == WalkAction::Skip {
            continue;
        }
        let children: Vec<Node<'t>> = current.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

/// All descendants (including `node`) of the given kind, in source order.
pub fn descendants_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    walk(node, |n| {
        if n.kind() == kind {
            found.push(n);
        }
        WalkAction::Descend
    });
    found
}

pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn is_comment(node: &Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

pub fn is_type_declaration(node: &Node) -> bool {
    TYPE_DECLARATIONS.contains(&node.kind())
}

pub fn is_callable_declaration(node: &Node) -> bool {
    matches!(node.kind(), METHOD_DECLARATION | CONSTRUCTOR_DECLARATION)
}

/// UTF-8 text of a node; empty for invalid UTF-8.
pub fn node_text<'s>(node: &Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Node text with all whitespace removed, e.g. for type text.
pub fn compact_text(node: &Node, source: &[u8]) -> String {
    node_text(node, source)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Leaf tokens joined by single spaces, optionally without comments.
///
/// Layout and comment edits produce identical output, so two bodies
/// compare equal exactly when their token streams do. Leaf text is kept
/// verbatim: whitespace inside a leaf is literal content.
pub fn normalized_text(node: &Node, source: &[u8], strip_comments: bool) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    walk(*node, |n| {
        if strip_comments && is_comment(&n) {
            return WalkAction::Skip;
        }
        if n.child_count() == 0 {
            let text = node_text(&n, source);
            if !text.is_empty() {
                tokens.push(text);
            }
        }
        WalkAction::Descend
    });
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_normalized_text_ignores_layout_and_comments() {
        let a = "class A { void f() { int x = 1; // note\n return; } }";
        let b = "class A {\n  void f() {\n    /* other */ int x =\n 1;\n    return;\n  }\n}";
        let ta = parse(a);
        let tb = parse(b);
        let na = normalized_text(&ta.root_node(), a.as_bytes(), true);
        let nb = normalized_text(&tb.root_node(), b.as_bytes(), true);
        assert_eq!(na, nb);
        assert!(!na.contains("note"));
    }

    #[test]
    fn test_normalized_text_keeps_comments_when_asked() {
        let src = "class A { void f() { /* keep */ } }";
        let tree = parse(src);
        let text = normalized_text(&tree.root_node(), src.as_bytes(), false);
        assert!(text.contains("/* keep */"));
    }

    #[test]
    fn test_normalized_text_keeps_literal_whitespace() {
        let a = r#"class A { String f() { return " "; } }"#;
        let b = r#"class A { String f() { return ""; } }"#;
        let (ta, tb) = (parse(a), parse(b));
        assert_ne!(
            normalized_text(&ta.root_node(), a.as_bytes(), true),
            normalized_text(&tb.root_node(), b.as_bytes(), true)
        );
    }

    #[test]
    fn test_descendants_in_source_order() {
        let src = "class A { void f() { a(); b(); } void g() { c(); } }";
        let tree = parse(src);
        let calls = descendants_of_kind(tree.root_node(), METHOD_INVOCATION);
        let names: Vec<&str> = calls
            .iter()
            .filter_map(|c| c.child_by_field_name("name"))
            .map(|n| node_text(&n, src.as_bytes()))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
