//! Java parser using native tree-sitter.
//!
//! Produces a `CompilationUnit` that owns both the source text and the tree,
//! and exposes type declarations with their callables and fields.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tree_sitter::{Node, Parser, Tree};

use comply_core::errors::ParseError;

use super::error_tolerant::count_errors;
use super::syntax::{self, compact_text, is_callable_declaration, is_type_declaration, node_text};
use super::types::{AstHandle, Range};
use crate::methods::signature::simple_type_name;

/// Java parser
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| ParseError::GrammarLoad {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse in-memory source. `path` is only used for diagnostics.
    pub fn parse(&mut self, source: String, path: &Path) -> Result<CompilationUnit, ParseError> {
        let start = Instant::now();
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ParseError::TreeSitterError {
                path: path.to_path_buf(),
                message: "parser returned no tree".to_string(),
            })?;

        let (error_count, error_ranges) = count_errors(tree.root_node());
        let parse_time_us = start.elapsed().as_micros() as u64;
        if error_count > 0 {
            tracing::warn!(
                path = %path.display(),
                parse_error_count = error_count,
                "source has syntax errors, continuing with a partial tree"
            );
        }
        tracing::debug!(path = %path.display(), parse_time_us, "parsed java source");

        Ok(CompilationUnit {
            path: path.to_path_buf(),
            source,
            tree,
            error_count,
            error_ranges,
            parse_time_us,
        })
    }

    /// Read and parse a file.
    pub fn parse_file(&mut self, path: &Path) -> Result<CompilationUnit, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(source, path)
    }
}

/// A parsed Java source file.
pub struct CompilationUnit {
    pub path: PathBuf,
    source: String,
    tree: Tree,
    pub error_count: u32,
    pub error_ranges: Vec<Range>,
    pub parse_time_us: u64,
}

impl CompilationUnit {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: &Node) -> &str {
        node_text(node, self.bytes())
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Every type declaration in the file, outer types first, in source order.
    pub fn type_declarations(&self) -> Vec<TypeDecl<'_>> {
        let mut found = Vec::new();
        syntax::walk(self.root(), |node| {
            if is_type_declaration(&node) {
                if let Some(decl) = TypeDecl::from_node(node, self.bytes()) {
                    found.push(decl);
                }
            }
            syntax::WalkAction::Descend
        });
        found
    }

    /// First type declaration named `name`, preferring top-level types.
    pub fn find_type(&self, name: &str) -> Option<TypeDecl<'_>> {
        let decls = self.type_declarations();
        let mut matching = decls.into_iter().filter(|d| d.name == name);
        let first = matching.next()?;
        if !first.nested {
            return Some(first);
        }
        matching.find(|d| !d.nested).or(Some(first))
    }

    /// First top-level type declaration.
    pub fn primary_type(&self) -> Option<TypeDecl<'_>> {
        self.type_declarations().into_iter().find(|d| !d.nested)
    }

    /// Re-acquire a callable declaration node from its handle.
    pub fn node_for(&self, handle: &AstHandle) -> Option<Node<'_>> {
        let mut node = self
            .root()
            .descendant_for_byte_range(handle.start_byte, handle.end_byte)?;
        loop {
            if is_callable_declaration(&node)
                && node.start_byte() == handle.start_byte
                && node.end_byte() == handle.end_byte
            {
                return Some(node);
            }
            node = node.parent()?;
        }
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

/// A class, interface, enum, or record declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl<'t> {
    pub node: Node<'t>,
    pub name: String,
    pub kind: TypeKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Declared inside another type.
    pub nested: bool,
}

/// A field declared in a type body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_text: String,
}

impl<'t> TypeDecl<'t> {
    fn from_node(node: Node<'t>, source: &[u8]) -> Option<Self> {
        let kind = match node.kind() {
            "class_declaration" => TypeKind::Class,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            _ => return None,
        };
        let name = node_text(&node.child_by_field_name("name")?, source).to_string();

        let superclass = node
            .child_by_field_name("superclass")
            .and_then(|sc| syntax::named_children(sc).into_iter().next())
            .map(|t| simple_type_name(node_text(&t, source)));

        let mut interfaces = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if matches!(child.kind(), "super_interfaces" | "extends_interfaces") {
                for list in syntax::named_children(child) {
                    for ty in syntax::named_children(list) {
                        interfaces.push(simple_type_name(node_text(&ty, source)));
                    }
                }
            }
        }

        let mut nested = false;
        let mut parent = node.parent();
        while let Some(p) = parent {
            if is_type_declaration(&p) || p.kind() == "object_creation_expression" {
                nested = true;
                break;
            }
            parent = p.parent();
        }

        Some(Self {
            node,
            name,
            kind,
            superclass,
            interfaces,
            nested,
        })
    }

    pub fn body(&self) -> Option<Node<'t>> {
        self.node.child_by_field_name("body")
    }

    /// Members of the body, looking through an enum's body declarations.
    fn members(&self) -> Vec<Node<'t>> {
        let Some(body) = self.body() else {
            return Vec::new();
        };
        let mut members = Vec::new();
        for child in syntax::named_children(body) {
            if child.kind() == "enum_body_declarations" {
                members.extend(syntax::named_children(child));
            } else {
                members.push(child);
            }
        }
        members
    }

    /// Methods and constructors declared directly in this type.
    pub fn callables(&self) -> Vec<Node<'t>> {
        self.members()
            .into_iter()
            .filter(is_callable_declaration)
            .collect()
    }

    /// Types declared directly in this type's body.
    pub fn nested_types(&self, source: &[u8]) -> Vec<TypeDecl<'t>> {
        self.members()
            .into_iter()
            .filter(is_type_declaration)
            .filter_map(|n| TypeDecl::from_node(n, source))
            .collect()
    }

    /// Fields declared directly in this type, plus record components.
    pub fn fields(&self, source: &[u8]) -> Vec<FieldDecl> {
        let mut fields = Vec::new();
        for member in self.members() {
            if member.kind() != "field_declaration" {
                continue;
            }
            let Some(ty) = member.child_by_field_name("type") else {
                continue;
            };
            let base = compact_text(&ty, source);
            let mut cursor = member.walk();
            for declarator in member.children_by_field_name("declarator", &mut cursor) {
                if let Some(name) = declarator.child_by_field_name("name") {
                    let dims = declarator
                        .child_by_field_name("dimensions")
                        .map(|d| compact_text(&d, source))
                        .unwrap_or_default();
                    fields.push(FieldDecl {
                        name: node_text(&name, source).to_string(),
                        type_text: format!("{base}{dims}"),
                    });
                }
            }
        }
        if self.kind == TypeKind::Record {
            if let Some(params) = self.node.child_by_field_name("parameters") {
                for param in syntax::named_children(params) {
                    if let (Some(ty), Some(name)) = (
                        param.child_by_field_name("type"),
                        param.child_by_field_name("name"),
                    ) {
                        fields.push(FieldDecl {
                            name: node_text(&name, source).to_string(),
                            type_text: compact_text(&ty, source),
                        });
                    }
                }
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> CompilationUnit {
        let mut parser = JavaParser::new().unwrap();
        parser.parse(src.to_string(), Path::new("Test.java")).unwrap()
    }

    #[test]
    fn test_parse_class_header() {
        let unit = parse(
            "public class LinkedBag<T> extends AbstractBag<T> implements BagInterface<T>, Cloneable { }",
        );
        let decl = unit.find_type("LinkedBag").unwrap();
        assert_eq!(decl.kind, TypeKind::Class);
        assert_eq!(decl.superclass.as_deref(), Some("AbstractBag"));
        assert_eq!(decl.interfaces, vec!["BagInterface", "Cloneable"]);
        assert!(!decl.nested);
        assert!(!unit.has_errors());
    }

    #[test]
    fn test_nested_types_are_marked() {
        let unit = parse("class Outer { private class Node { int data; } void f() {} }");
        let decls = unit.type_declarations();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "Outer");
        assert!(decls[1].nested);
        assert_eq!(unit.primary_type().unwrap().name, "Outer");
        assert_eq!(decls[0].nested_types(unit.bytes()).len(), 1);
    }

    #[test]
    fn test_callables_and_fields() {
        let unit = parse(
            "class Bag { private Node first; private int count, cap; private int[] data, old[];\n\
             Bag() {} int size() { return count; } }",
        );
        let decl = unit.find_type("Bag").unwrap();
        assert_eq!(decl.callables().len(), 2);
        let fields = decl.fields(unit.bytes());
        let names: Vec<(&str, &str)> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_text.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("first", "Node"),
                ("count", "int"),
                ("cap", "int"),
                ("data", "int[]"),
                ("old", "int[][]"),
            ]
        );
    }

    #[test]
    fn test_enum_methods_are_found() {
        let unit = parse("enum Color { RED, GREEN; int code() { return 1; } }");
        let decl = unit.find_type("Color").unwrap();
        assert_eq!(decl.kind, TypeKind::Enum);
        assert_eq!(decl.callables().len(), 1);
    }

    #[test]
    fn test_handle_round_trip() {
        let unit = parse("class A { void f() { } A() { } }");
        let decl = unit.find_type("A").unwrap();
        for callable in decl.callables() {
            let handle = AstHandle::from_node(&callable);
            let found = unit.node_for(&handle).unwrap();
            assert_eq!(found.id(), callable.id());
        }
    }

    #[test]
    fn test_syntax_errors_are_counted_not_fatal() {
        let unit = parse("class A { void f() { int x = ; } }");
        assert!(unit.has_errors());
        assert!(unit.find_type("A").is_some());
    }
}
