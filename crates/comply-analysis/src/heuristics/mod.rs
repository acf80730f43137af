//! Heuristics: predicates over one parsed callable's body.
//!
//! Calls and instantiations are matched on normalized signatures after
//! resolution. A call that cannot be resolved is a non-match, never an error.

pub mod calls;
pub mod instantiation;
pub mod resolution;
pub mod scope;
pub mod statements;
pub mod symbols;

use tree_sitter::Node;

use crate::parsers::syntax::node_text;
use crate::parsers::CompilationUnit;

pub use calls::{calls_constructor_with_signature, calls_method_with_signature};
pub use instantiation::{instantiates_class_with_signature, times_class_instantiated_with_signature_called};
pub use resolution::{Resolution, ResolveError, ResolvedCallable, Resolver};
pub use scope::LocalScope;
pub use symbols::{CallableSymbol, ParamSymbol, SymbolTable, TypeSymbol, ValueKind};

/// One callable declaration plus everything needed to reason about it.
#[derive(Clone, Copy)]
pub struct CallableContext<'a> {
    pub unit: &'a CompilationUnit,
    /// A `method_declaration` or `constructor_declaration`.
    pub node: Node<'a>,
    pub class_name: &'a str,
    pub symbols: &'a SymbolTable,
    pub resolve_external_calls: bool,
}

impl<'a> CallableContext<'a> {
    pub fn new(
        unit: &'a CompilationUnit,
        node: Node<'a>,
        class_name: &'a str,
        symbols: &'a SymbolTable,
    ) -> Self {
        Self {
            unit,
            node,
            class_name,
            symbols,
            resolve_external_calls: false,
        }
    }

    pub fn with_external_calls(mut self, resolve_external_calls: bool) -> Self {
        self.resolve_external_calls = resolve_external_calls;
        self
    }

    pub fn source(&self) -> &'a [u8] {
        self.unit.bytes()
    }

    pub fn body(&self) -> Option<Node<'a>> {
        self.node.child_by_field_name("body")
    }

    /// `Class.name` for log and error messages.
    pub fn display_name(&self) -> String {
        let name = self
            .node
            .child_by_field_name("name")
            .map(|n| node_text(&n, self.source()))
            .unwrap_or("<anonymous>");
        format!("{}.{}", self.class_name, name)
    }
}
