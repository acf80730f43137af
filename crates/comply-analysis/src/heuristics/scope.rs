//! Declared types of the names visible inside one callable.

use tree_sitter::Node;

use comply_core::types::collections::FxHashMap;

use crate::parsers::syntax::{self, compact_text, node_text, WalkAction};

/// Parameters and locals of a callable, name to declared type text.
///
/// Flat: block scoping is ignored and the first declaration of a name wins.
/// Nested type declarations are not entered.
#[derive(Debug, Clone, Default)]
pub struct LocalScope {
    names: FxHashMap<String, String>,
}

impl LocalScope {
    pub fn of_callable(callable: Node<'_>, source: &[u8]) -> Self {
        let mut scope = Self::default();
        syntax::walk(callable, |node| {
            if node.id() != callable.id() && syntax::is_type_declaration(&node) {
                return WalkAction::Skip;
            }
            match node.kind() {
                "formal_parameter" | "catch_formal_parameter" | "resource" | "enhanced_for_statement" => {
                    scope.declare_typed(node, source);
                }
                "spread_parameter" => scope.declare_spread(node, source),
                "local_variable_declaration" => scope.declare_locals(node, source),
                _ => {}
            }
            WalkAction::Descend
        });
        scope
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn insert(&mut self, name: &str, type_text: String) {
        self.names.entry(name.to_string()).or_insert(type_text);
    }

    /// Nodes with `type` (or a `catch_type` child), `name` and optional
    /// `dimensions` fields.
    fn declare_typed(&mut self, node: Node<'_>, source: &[u8]) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let base = node
            .child_by_field_name("type")
            .or_else(|| {
                syntax::named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "catch_type")
            })
            .map(|t| compact_text(&t, source))
            .unwrap_or_default();
        let dims = node
            .child_by_field_name("dimensions")
            .map(|d| compact_text(&d, source))
            .unwrap_or_default();
        self.insert(node_text(&name, source), format!("{base}{dims}"));
    }

    fn declare_spread(&mut self, node: Node<'_>, source: &[u8]) {
        let children = syntax::named_children(node);
        let ty = children
            .iter()
            .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"));
        let declarator = children.iter().find(|c| c.kind() == "variable_declarator");
        if let (Some(ty), Some(declarator)) = (ty, declarator) {
            if let Some(name) = declarator.child_by_field_name("name") {
                self.insert(node_text(&name, source), format!("{}[]", compact_text(ty, source)));
            }
        }
    }

    fn declare_locals(&mut self, node: Node<'_>, source: &[u8]) {
        let Some(ty) = node.child_by_field_name("type") else {
            return;
        };
        let base = compact_text(&ty, source);
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            if let Some(name) = declarator.child_by_field_name("name") {
                let dims = declarator
                    .child_by_field_name("dimensions")
                    .map(|d| compact_text(&d, source))
                    .unwrap_or_default();
                self.insert(node_text(&name, source), format!("{base}{dims}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parsers::JavaParser;

    #[test]
    fn test_collects_params_and_locals() {
        let src = r#"
class A {
    void f(int[] xs, String label, Object... rest) {
        int count = 0, grid[] = null;
        for (String item : items) { }
        try (Reader r = open()) { } catch (IOException | RuntimeException e) { }
    }
}"#;
        let mut parser = JavaParser::new().unwrap();
        let unit = parser.parse(src.to_string(), Path::new("A.java")).unwrap();
        let decl = unit.primary_type().unwrap();
        let scope = LocalScope::of_callable(decl.callables()[0], unit.bytes());

        assert_eq!(scope.type_of("xs"), Some("int[]"));
        assert_eq!(scope.type_of("label"), Some("String"));
        assert_eq!(scope.type_of("rest"), Some("Object[]"));
        assert_eq!(scope.type_of("count"), Some("int"));
        assert_eq!(scope.type_of("grid"), Some("int[]"));
        assert_eq!(scope.type_of("item"), Some("String"));
        assert_eq!(scope.type_of("r"), Some("Reader"));
        assert_eq!(scope.type_of("e"), Some("IOException|RuntimeException"));
        assert!(!scope.declares("items"));
    }
}
