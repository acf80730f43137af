//! Declared callables of every known type, for call resolution.

use serde::Serialize;

use comply_core::types::collections::{FxHashMap, FxHashSet, SmallVec4};

use crate::methods::info::parameter_types;
use crate::methods::signature::{is_array_type, normalized_from_parts, simple_type_name};
use crate::parsers::syntax::{self, compact_text, node_text};
use crate::parsers::{CompilationUnit, TypeDecl, TypeKind};

/// Whether a value is an array, for overload filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Array,
    Scalar,
    Unknown,
}

impl ValueKind {
    pub fn of_type(type_text: &str) -> Self {
        if is_array_type(type_text) {
            Self::Array
        } else {
            Self::Scalar
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSymbol {
    pub type_text: String,
    pub is_array: bool,
    pub varargs: bool,
}

impl ParamSymbol {
    pub fn new(type_text: &str) -> Self {
        Self {
            type_text: type_text.to_string(),
            is_array: is_array_type(type_text),
            varargs: type_text.ends_with("..."),
        }
    }

    /// Type variables and `Object` also bind array arguments.
    fn accepts_any_reference(&self) -> bool {
        let name = simple_type_name(&self.type_text);
        name == "Object" || (name.len() == 1 && name.chars().all(|c| c.is_ascii_uppercase()))
    }

    fn accepts(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Unknown => true,
            ValueKind::Array => self.is_array || self.accepts_any_reference(),
            ValueKind::Scalar => !self.is_array,
        }
    }
}

/// A declared method or constructor.
#[derive(Debug, Clone, Serialize)]
pub struct CallableSymbol {
    pub class_name: String,
    pub name: String,
    pub params: SmallVec4<ParamSymbol>,
    pub return_type: Option<String>,
    pub is_constructor: bool,
    /// Not written in source: a default or record canonical constructor.
    pub implicit: bool,
}

impl CallableSymbol {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.varargs)
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.is_varargs() {
            count + 1 >= self.arity()
        } else {
            count == self.arity()
        }
    }

    /// Whether every argument kind fits its parameter.
    pub fn accepts_kinds(&self, kinds: &[ValueKind]) -> bool {
        if !self.accepts_arity(kinds.len()) {
            return false;
        }
        let fixed = if self.is_varargs() {
            self.arity() - 1
        } else {
            self.arity()
        };
        kinds
            .iter()
            .take(fixed)
            .zip(self.params.iter())
            .all(|(kind, param)| param.accepts(*kind))
    }

    /// Number of arguments whose kind matches the parameter exactly.
    pub fn specificity(&self, kinds: &[ValueKind]) -> usize {
        kinds
            .iter()
            .zip(self.params.iter())
            .filter(|(kind, param)| match kind {
                ValueKind::Array => param.is_array,
                ValueKind::Scalar => !param.is_array,
                ValueKind::Unknown => false,
            })
            .count()
    }

    pub fn canonical_signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.type_text.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn normalized_signature(&self) -> String {
        normalized_from_parts(&self.name, self.params.iter().map(|p| p.is_array))
    }

    fn from_node(node: tree_sitter::Node<'_>, class_name: &str, source: &[u8]) -> Option<Self> {
        let is_constructor = node.kind() == syntax::CONSTRUCTOR_DECLARATION;
        let name = node_text(&node.child_by_field_name("name")?, source).to_string();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| parameter_types(p, source))
            .unwrap_or_default()
            .iter()
            .map(|t| ParamSymbol::new(t))
            .collect();
        let return_type = if is_constructor {
            None
        } else {
            node.child_by_field_name("type").map(|t| compact_text(&t, source))
        };
        Some(Self {
            class_name: class_name.to_string(),
            name,
            params,
            return_type,
            is_constructor,
            implicit: false,
        })
    }
}

/// A declared class, interface, enum, or record.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSymbol {
    pub name: String,
    #[serde(skip)]
    pub kind: TypeKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Field name to declared type text.
    pub fields: FxHashMap<String, String>,
    pub methods: Vec<CallableSymbol>,
    pub constructors: Vec<CallableSymbol>,
}

impl TypeSymbol {
    pub fn from_decl(decl: &TypeDecl<'_>, source: &[u8]) -> Self {
        let mut methods = Vec::new();
        let mut constructors = Vec::new();
        for node in decl.callables() {
            if let Some(symbol) = CallableSymbol::from_node(node, &decl.name, source) {
                if symbol.is_constructor {
                    constructors.push(symbol);
                } else {
                    methods.push(symbol);
                }
            }
        }

        let fields: FxHashMap<String, String> = decl
            .fields(source)
            .into_iter()
            .map(|f| (f.name, f.type_text))
            .collect();

        if constructors.is_empty() {
            match decl.kind {
                TypeKind::Class | TypeKind::Enum => constructors.push(CallableSymbol {
                    class_name: decl.name.clone(),
                    name: decl.name.clone(),
                    params: SmallVec4::new(),
                    return_type: None,
                    is_constructor: true,
                    implicit: true,
                }),
                TypeKind::Record => {
                    let params = decl
                        .node
                        .child_by_field_name("parameters")
                        .map(|p| parameter_types(p, source))
                        .unwrap_or_default()
                        .iter()
                        .map(|t| ParamSymbol::new(t))
                        .collect();
                    constructors.push(CallableSymbol {
                        class_name: decl.name.clone(),
                        name: decl.name.clone(),
                        params,
                        return_type: None,
                        is_constructor: true,
                        implicit: true,
                    });
                }
                TypeKind::Interface => {}
            }
        }

        Self {
            name: decl.name.clone(),
            kind: decl.kind,
            superclass: decl.superclass.clone(),
            interfaces: decl.interfaces.clone(),
            fields,
            methods,
            constructors,
        }
    }
}

/// All types known to one analysis run, keyed by simple name.
///
/// The first declaration of a name wins, so the unit added first shadows
/// same-named types from later units.
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: FxHashMap<String, TypeSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units<'u>(units: impl IntoIterator<Item = &'u CompilationUnit>) -> Self {
        let mut table = Self::new();
        for unit in units {
            table.add_unit(unit);
        }
        table
    }

    /// Register every type declared in `unit`, nested types included.
    pub fn add_unit(&mut self, unit: &CompilationUnit) {
        for decl in unit.type_declarations() {
            if self.types.contains_key(&decl.name) {
                tracing::debug!(
                    path = %unit.path.display(),
                    type_name = %decl.name,
                    "type already known, keeping the earlier declaration"
                );
                continue;
            }
            let symbol = TypeSymbol::from_decl(&decl, unit.bytes());
            self.types.insert(decl.name.clone(), symbol);
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeSymbol> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `type_name` followed by its known supertypes, breadth first.
    pub fn hierarchy(&self, type_name: &str) -> Vec<&TypeSymbol> {
        let mut ordered = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = vec![type_name.to_string()];
        while !queue.is_empty() {
            let mut next = Vec::new();
            for name in queue {
                if !seen.insert(name.clone()) {
                    continue;
                }
                if let Some(symbol) = self.types.get(&name) {
                    next.extend(symbol.superclass.iter().cloned());
                    next.extend(symbol.interfaces.iter().cloned());
                    ordered.push(symbol);
                }
            }
            queue = next;
        }
        ordered
    }

    /// Methods named `name` declared in `type_name` or its supertypes.
    /// An override hides the supertype declaration with the same signature.
    pub fn methods_in_hierarchy(&self, type_name: &str, name: &str) -> Vec<&CallableSymbol> {
        let mut found: Vec<&CallableSymbol> = Vec::new();
        let mut signatures = FxHashSet::default();
        for symbol in self.hierarchy(type_name) {
            for method in symbol.methods.iter().filter(|m| m.name == name) {
                if signatures.insert(method.canonical_signature()) {
                    found.push(method);
                }
            }
        }
        found
    }

    /// Methods named `name` in any known type.
    pub fn methods_named(&self, name: &str) -> Vec<&CallableSymbol> {
        let mut found: Vec<&CallableSymbol> = self
            .types
            .values()
            .flat_map(|t| t.methods.iter())
            .filter(|m| m.name == name)
            .collect();
        found.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        found
    }

    /// Constructors of a known type, or `None` for an unknown type.
    pub fn constructors_of(&self, type_name: &str) -> Option<&[CallableSymbol]> {
        self.types.get(type_name).map(|t| t.constructors.as_slice())
    }

    /// Declared type of a field, searching superclasses too.
    pub fn field_type(&self, type_name: &str, field: &str) -> Option<&str> {
        self.hierarchy(type_name)
            .into_iter()
            .find_map(|t| t.fields.get(field).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parsers::JavaParser;

    fn table(sources: &[&str]) -> SymbolTable {
        let mut parser = JavaParser::new().unwrap();
        let units: Vec<CompilationUnit> = sources
            .iter()
            .map(|s| parser.parse(s.to_string(), Path::new("T.java")).unwrap())
            .collect();
        SymbolTable::from_units(&units)
    }

    #[test]
    fn test_implicit_default_constructor() {
        let symbols = table(&["class Plain { int x; }", "interface Shape { double area(); }"]);
        let ctors = symbols.constructors_of("Plain").unwrap();
        assert_eq!(ctors.len(), 1);
        assert!(ctors[0].implicit);
        assert_eq!(ctors[0].normalized_signature(), "Plain()");
        assert!(symbols.constructors_of("Shape").unwrap().is_empty());
        assert!(symbols.constructors_of("Missing").is_none());
    }

    #[test]
    fn test_hierarchy_lookup_and_overrides() {
        let symbols = table(&[
            "class Base { void add(Object o) {} int size() { return 0; } }",
            "class Derived extends Base implements Sized { void add(Object o) {} int[] items; }",
            "interface Sized { int size(); boolean isEmpty(); }",
        ]);
        let adds = symbols.methods_in_hierarchy("Derived", "add");
        assert_eq!(adds.len(), 1);
        assert_eq!(adds[0].class_name, "Derived");
        assert_eq!(symbols.methods_in_hierarchy("Derived", "isEmpty").len(), 1);
        assert_eq!(symbols.field_type("Derived", "items"), Some("int[]"));
    }

    #[test]
    fn test_kind_filtering() {
        let symbols = table(&["class A { void f(int x) {} void f(int[] xs) {} void g(String... s) {} }"]);
        let fs = symbols.methods_named("f");
        let scalar = fs.iter().find(|m| !m.params[0].is_array).unwrap();
        let array = fs.iter().find(|m| m.params[0].is_array).unwrap();
        assert!(scalar.accepts_kinds(&[ValueKind::Scalar]));
        assert!(!scalar.accepts_kinds(&[ValueKind::Array]));
        assert!(array.accepts_kinds(&[ValueKind::Array]));
        assert!(!array.accepts_kinds(&[ValueKind::Scalar]));

        let g = symbols.methods_named("g")[0];
        assert!(g.accepts_kinds(&[]));
        assert!(g.accepts_kinds(&[ValueKind::Scalar, ValueKind::Scalar]));
        assert_eq!(g.normalized_signature(), "g([])");
    }
}
