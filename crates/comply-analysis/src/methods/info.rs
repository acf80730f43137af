//! MethodInfo: read-mostly snapshot of one parsed method or constructor.

use serde::Serialize;
use tree_sitter::Node;

use comply_core::types::collections::SmallVec4;

use super::key::{MethodKey, MethodKind};
use crate::parsers::syntax::{self, compact_text, is_comment, node_text, normalized_text};
use crate::parsers::{AstHandle, CompilationUnit};
use crate::requirements::Compliance;

#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub name: String,
    /// Canonical signature, e.g. `union(BagInterface<T>)`.
    pub signature: String,
    pub parameter_types: SmallVec4<String>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    /// Normalized text of each top-level body statement.
    pub statements: Vec<String>,
    /// Normalized text of the whole body; empty when there is no body.
    pub body_text: String,
    pub is_constructor: bool,
    pub class_name: String,
    /// 1-based line of the declaration.
    pub line: u32,
    pub handle: AstHandle,
    pub compliance: Compliance,
}

impl MethodInfo {
    /// Snapshot a `method_declaration` or `constructor_declaration`.
    pub fn from_node(
        unit: &CompilationUnit,
        node: Node<'_>,
        class_name: &str,
        strip_comments: bool,
    ) -> Option<Self> {
        let source = unit.bytes();
        let is_constructor = node.kind() == syntax::CONSTRUCTOR_DECLARATION;
        if !is_constructor && node.kind() != syntax::METHOD_DECLARATION {
            return None;
        }

        let name = node_text(&node.child_by_field_name("name")?, source).to_string();
        let parameter_types: SmallVec4<String> = node
            .child_by_field_name("parameters")
            .map(|params| parameter_types(params, source))
            .unwrap_or_default();
        let return_type = if is_constructor {
            None
        } else {
            node.child_by_field_name("type")
                .map(|t| compact_text(&t, source))
        };

        let body = node.child_by_field_name("body");
        let body_text = body
            .map(|b| normalized_text(&b, source, strip_comments))
            .unwrap_or_default();
        let statements = body
            .map(|b| {
                syntax::named_children(b)
                    .into_iter()
                    .filter(|s| !is_comment(s))
                    .map(|s| normalized_text(&s, source, strip_comments))
                    .collect()
            })
            .unwrap_or_default();

        let signature = format!("{}({})", name, parameter_types.join(","));

        Some(Self {
            name,
            signature,
            parameter_types,
            return_type,
            statements,
            body_text,
            is_constructor,
            class_name: class_name.to_string(),
            line: node.start_position().row as u32 + 1,
            handle: AstHandle::from_node(&node),
            compliance: Compliance::Unknown,
        })
    }

    pub fn kind(&self) -> MethodKind {
        if self.is_constructor {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        }
    }

    pub fn key(&self) -> MethodKey {
        MethodKey::new(&self.class_name, self.kind(), &self.signature)
    }

    pub fn set_compliance(&mut self, compliance: Compliance) {
        self.compliance = compliance;
    }
}

/// Canonical parameter types of a `formal_parameters` node.
pub fn parameter_types(params: Node<'_>, source: &[u8]) -> SmallVec4<String> {
    let mut types = SmallVec4::new();
    for param in syntax::named_children(params) {
        match param.kind() {
            "formal_parameter" => {
                let Some(ty) = param.child_by_field_name("type") else {
                    continue;
                };
                let dims = param
                    .child_by_field_name("dimensions")
                    .map(|d| compact_text(&d, source))
                    .unwrap_or_default();
                types.push(format!("{}{}", compact_text(&ty, source), dims));
            }
            "spread_parameter" => {
                let ty = syntax::named_children(param)
                    .into_iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"));
                if let Some(ty) = ty {
                    types.push(format!("{}...", compact_text(&ty, source)));
                }
            }
            _ => {}
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parsers::JavaParser;

    fn first_callable(src: &str) -> MethodInfo {
        let mut parser = JavaParser::new().unwrap();
        let unit = parser.parse(src.to_string(), Path::new("A.java")).unwrap();
        let decl = unit.primary_type().unwrap();
        let node = decl.callables()[0];
        MethodInfo::from_node(&unit, node, &decl.name, true).unwrap()
    }

    #[test]
    fn test_method_snapshot() {
        let info = first_callable(
            "class A<T> { public boolean add(final T newEntry, int[] xs, String... rest) {\n\
             // comment\n int n = 0;\n return true; } }",
        );
        assert_eq!(info.name, "add");
        assert_eq!(info.signature, "add(T,int[],String...)");
        assert_eq!(info.return_type.as_deref(), Some("boolean"));
        assert_eq!(info.statements, vec!["int n = 0 ;", "return true ;"]);
        assert!(!info.is_constructor);
        assert_eq!(info.key().as_str(), "A::method::add(T,int[],String...)");
        assert_eq!(info.compliance, Compliance::Unknown);
    }

    #[test]
    fn test_constructor_snapshot() {
        let info = first_callable("class Bag { Bag(Bag<T> other) { this(); } Bag() {} }");
        assert!(info.is_constructor);
        assert_eq!(info.return_type, None);
        assert_eq!(info.signature, "Bag(Bag<T>)");
        assert_eq!(info.kind(), MethodKind::Constructor);
    }

    #[test]
    fn test_abstract_method_has_empty_body() {
        let info = first_callable("interface I { int size(); }");
        assert!(info.body_text.is_empty());
        assert!(info.statements.is_empty());
    }
}
