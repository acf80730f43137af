//! Call resolution strategies: EnclosingType, ReceiverType, AnyType, External.
//! First match wins; strategies are tried in order of decreasing confidence.
//!
//! Overloads are narrowed by argument arity and by whether each argument is
//! an array. What remains must agree on one normalized signature.

use serde::Serialize;
use tree_sitter::Node;

use crate::methods::signature::{normalized_from_parts, simple_type_name};
use crate::parsers::syntax::{self, compact_text, node_text};

use super::scope::LocalScope;
use super::symbols::{CallableSymbol, ValueKind};
use super::CallableContext;

/// Why a call expression could not be tied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no declaration found for {name}")]
    NoDeclaration { name: String },

    #[error("no overload of {name} accepts {arity} argument(s) of the given kinds")]
    NoApplicableOverload { name: String, arity: usize },

    #[error("call to {name} is ambiguous between {candidates} overloads")]
    Ambiguous { name: String, candidates: usize },

    #[error("unsupported expression: {kind}")]
    UnsupportedExpression { kind: String },
}

/// Strategy that produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    /// Unqualified call declared in the enclosing type or its supertypes.
    EnclosingType,
    /// Call on a receiver whose declared type is known.
    ReceiverType,
    /// Receiver type unknown; any known type declaring the name.
    AnyType,
    /// No known declaration; signature synthesized from the call site.
    External,
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnclosingType => "enclosing_type",
            Self::ReceiverType => "receiver_type",
            Self::AnyType => "any_type",
            Self::External => "external",
        }
    }
}

/// The declaration a call resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCallable {
    pub class_name: Option<String>,
    pub name: String,
    /// Normalized signature, e.g. `add(*)`.
    pub normalized: String,
    /// Declared signature; `None` when synthesized.
    pub canonical: Option<String>,
    pub return_type: Option<String>,
    pub strategy: Resolution,
}

impl ResolvedCallable {
    fn from_symbol(symbol: &CallableSymbol, strategy: Resolution) -> Self {
        Self {
            class_name: Some(symbol.class_name.clone()),
            name: symbol.name.clone(),
            normalized: symbol.normalized_signature(),
            canonical: Some(symbol.canonical_signature()),
            return_type: symbol.return_type.clone(),
            strategy,
        }
    }
}

/// Resolves call, creation and constructor-chaining expressions inside
/// one callable.
pub struct Resolver<'c, 'a> {
    ctx: &'c CallableContext<'a>,
    scope: LocalScope,
}

impl<'c, 'a> Resolver<'c, 'a> {
    pub fn new(ctx: &'c CallableContext<'a>) -> Self {
        Self {
            ctx,
            scope: LocalScope::of_callable(ctx.node, ctx.source()),
        }
    }

    /// Resolve a `method_invocation` node.
    pub fn resolve_method_call(&self, call: Node<'_>) -> Result<ResolvedCallable, ResolveError> {
        if call.kind() != syntax::METHOD_INVOCATION {
            return Err(unsupported(call));
        }
        let name = call
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .ok_or_else(|| unsupported(call))?;
        let kinds = self.argument_kinds(call);

        match call.child_by_field_name("object") {
            None => {
                for type_name in self.enclosing_types() {
                    let candidates = self.ctx.symbols.methods_in_hierarchy(&type_name, &name);
                    if !candidates.is_empty() {
                        return select(&name, candidates, &kinds, Resolution::EnclosingType);
                    }
                }
                self.external(None, &name, &kinds)
            }
            Some(object) => match self.receiver_type(object) {
                Some(type_name) if self.ctx.symbols.contains(&type_name) => {
                    let candidates = self.ctx.symbols.methods_in_hierarchy(&type_name, &name);
                    if candidates.is_empty() {
                        return self.external(Some(type_name), &name, &kinds);
                    }
                    select(&name, candidates, &kinds, Resolution::ReceiverType)
                }
                Some(type_name) => self.external(Some(type_name), &name, &kinds),
                None => {
                    let candidates = self.ctx.symbols.methods_named(&name);
                    if candidates.is_empty() {
                        return self.external(None, &name, &kinds);
                    }
                    select(&name, candidates, &kinds, Resolution::AnyType)
                }
            },
        }
    }

    /// Resolve an `object_creation_expression` to a constructor.
    pub fn resolve_object_creation(&self, creation: Node<'_>) -> Result<ResolvedCallable, ResolveError> {
        if creation.kind() != syntax::OBJECT_CREATION_EXPRESSION {
            return Err(unsupported(creation));
        }
        let type_name = creation
            .child_by_field_name("type")
            .map(|t| simple_type_name(self.text(t)))
            .ok_or_else(|| unsupported(creation))?;
        let kinds = self.argument_kinds(creation);
        let anonymous = syntax::named_children(creation)
            .iter()
            .any(|c| c.kind() == "class_body");

        match self.ctx.symbols.constructors_of(&type_name) {
            Some([]) if anonymous && kinds.is_empty() => Ok(ResolvedCallable {
                class_name: Some(type_name.clone()),
                normalized: normalized_from_parts(&type_name, []),
                canonical: Some(format!("{type_name}()")),
                name: type_name,
                return_type: None,
                strategy: Resolution::ReceiverType,
            }),
            Some(ctors) => select(&type_name, ctors.iter().collect(), &kinds, Resolution::ReceiverType),
            None => self.external(Some(type_name.clone()), &type_name, &kinds),
        }
    }

    /// Resolve an `explicit_constructor_invocation` (`this(...)`/`super(...)`).
    pub fn resolve_constructor_invocation(
        &self,
        invocation: Node<'_>,
    ) -> Result<ResolvedCallable, ResolveError> {
        if invocation.kind() != syntax::EXPLICIT_CONSTRUCTOR_INVOCATION {
            return Err(unsupported(invocation));
        }
        let target = invocation
            .child_by_field_name("constructor")
            .ok_or_else(|| unsupported(invocation))?;
        let type_name = match target.kind() {
            "this" => self.ctx.class_name.to_string(),
            "super" => self.superclass_of(self.ctx.class_name),
            _ => return Err(unsupported(target)),
        };
        let kinds = self.argument_kinds(invocation);

        match self.ctx.symbols.constructors_of(&type_name) {
            Some(ctors) => select(&type_name, ctors.iter().collect(), &kinds, Resolution::EnclosingType),
            None => self.external(Some(type_name.clone()), &type_name, &kinds),
        }
    }

    /// Kinds of the `arguments` of a call-like node.
    pub fn argument_kinds(&self, call: Node<'_>) -> Vec<ValueKind> {
        call.child_by_field_name("arguments")
            .map(|args| {
                syntax::named_children(args)
                    .into_iter()
                    .filter(|a| !syntax::is_comment(a))
                    .map(|a| self.value_kind(a))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn value_kind(&self, expr: Node<'_>) -> ValueKind {
        match expr.kind() {
            "array_creation_expression" | "array_initializer" => ValueKind::Array,
            "null_literal" => ValueKind::Unknown,
            "ternary_expression" => {
                let consequence = expr.child_by_field_name("consequence").map(|n| self.value_kind(n));
                let alternative = expr.child_by_field_name("alternative").map(|n| self.value_kind(n));
                match (consequence, alternative) {
                    (Some(a), Some(b)) if a == b => a,
                    (Some(ValueKind::Unknown), Some(k)) | (Some(k), Some(ValueKind::Unknown)) => k,
                    _ => ValueKind::Unknown,
                }
            }
            "parenthesized_expression" => syntax::named_children(expr)
                .into_iter()
                .next()
                .map(|inner| self.value_kind(inner))
                .unwrap_or(ValueKind::Unknown),
            "binary_expression"
            | "unary_expression"
            | "instanceof_expression"
            | "lambda_expression"
            | "method_reference"
            | "update_expression"
            | "object_creation_expression"
            | "class_literal"
            | "string_literal"
            | "character_literal"
            | "true"
            | "false"
            | "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal" => ValueKind::Scalar,
            _ => self
                .expression_type(expr)
                .map(|t| ValueKind::of_type(&t))
                .unwrap_or(ValueKind::Unknown),
        }
    }

    /// Declared type text of an expression, when it can be inferred.
    pub fn expression_type(&self, expr: Node<'_>) -> Option<String> {
        match expr.kind() {
            "this" => Some(self.ctx.class_name.to_string()),
            "identifier" => self.identifier_type(self.text(expr)),
            "field_access" => {
                let field = self.text(expr.child_by_field_name("field")?);
                let object = expr.child_by_field_name("object")?;
                let owner = match object.kind() {
                    "this" => self.ctx.class_name.to_string(),
                    "super" => self.superclass_of(self.ctx.class_name),
                    _ => {
                        let object_type = self.expression_type(object)?;
                        if field == "length" && ValueKind::of_type(&object_type) == ValueKind::Array {
                            return Some("int".to_string());
                        }
                        simple_type_name(&object_type)
                    }
                };
                self.ctx.symbols.field_type(&owner, field).map(str::to_string)
            }
            "object_creation_expression" | "cast_expression" => {
                expr.child_by_field_name("type").map(|t| compact_text(&t, self.ctx.source()))
            }
            "array_creation_expression" => expr
                .child_by_field_name("type")
                .map(|t| format!("{}[]", compact_text(&t, self.ctx.source()))),
            "array_access" => {
                let array_type = self.expression_type(expr.child_by_field_name("array")?)?;
                array_type.strip_suffix("[]").map(str::to_string)
            }
            "parenthesized_expression" => syntax::named_children(expr)
                .into_iter()
                .next()
                .and_then(|inner| self.expression_type(inner)),
            "method_invocation" => self.resolve_method_call(expr).ok()?.return_type,
            "string_literal" => Some("String".to_string()),
            _ => None,
        }
    }

    /// Simple type name of a call receiver, or `None` when unknown.
    fn receiver_type(&self, object: Node<'_>) -> Option<String> {
        match object.kind() {
            "super" => Some(self.superclass_of(self.ctx.class_name)),
            "identifier" => {
                let name = self.text(object);
                if let Some(ty) = self.identifier_type(name) {
                    return Some(simple_type_name(&ty));
                }
                // Static call through a type name.
                let is_type_name = self.ctx.symbols.contains(name)
                    || name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
                is_type_name.then(|| name.to_string())
            }
            _ => self.expression_type(object).map(|t| simple_type_name(&t)),
        }
    }

    fn identifier_type(&self, name: &str) -> Option<String> {
        if let Some(ty) = self.scope.type_of(name) {
            return Some(ty.to_string());
        }
        self.enclosing_types()
            .iter()
            .find_map(|t| self.ctx.symbols.field_type(t, name))
            .map(str::to_string)
    }

    fn superclass_of(&self, type_name: &str) -> String {
        self.ctx
            .symbols
            .get(type_name)
            .and_then(|t| t.superclass.clone())
            .unwrap_or_else(|| "Object".to_string())
    }

    /// The context class first, then each lexically enclosing type.
    fn enclosing_types(&self) -> Vec<String> {
        let mut types = vec![self.ctx.class_name.to_string()];
        let mut parent = self.ctx.node.parent();
        while let Some(p) = parent {
            if syntax::is_type_declaration(&p) {
                if let Some(name) = p.child_by_field_name("name") {
                    let name = self.text(name).to_string();
                    if !types.contains(&name) {
                        types.push(name);
                    }
                }
            }
            parent = p.parent();
        }
        types
    }

    fn external(
        &self,
        class_name: Option<String>,
        name: &str,
        kinds: &[ValueKind],
    ) -> Result<ResolvedCallable, ResolveError> {
        if !self.ctx.resolve_external_calls {
            return Err(ResolveError::NoDeclaration {
                name: name.to_string(),
            });
        }
        Ok(ResolvedCallable {
            class_name,
            name: name.to_string(),
            normalized: normalized_from_parts(name, kinds.iter().map(|k| *k == ValueKind::Array)),
            canonical: None,
            return_type: None,
            strategy: Resolution::External,
        })
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node_text(&node, self.ctx.source())
    }
}

/// Narrow candidates by argument kinds, then by specificity, then by
/// preferring fixed arity over varargs.
fn select(
    name: &str,
    candidates: Vec<&CallableSymbol>,
    kinds: &[ValueKind],
    strategy: Resolution,
) -> Result<ResolvedCallable, ResolveError> {
    let applicable: Vec<&CallableSymbol> = candidates
        .into_iter()
        .filter(|c| c.accepts_kinds(kinds))
        .collect();
    if applicable.is_empty() {
        return Err(ResolveError::NoApplicableOverload {
            name: name.to_string(),
            arity: kinds.len(),
        });
    }

    let best = applicable
        .iter()
        .map(|c| c.specificity(kinds))
        .max()
        .unwrap_or(0);
    let most_specific: Vec<&CallableSymbol> = applicable
        .into_iter()
        .filter(|c| c.specificity(kinds) == best)
        .collect();
    if let Some(chosen) = single_signature(&most_specific) {
        return Ok(ResolvedCallable::from_symbol(chosen, strategy));
    }

    let fixed: Vec<&CallableSymbol> = most_specific
        .iter()
        .copied()
        .filter(|c| !c.is_varargs())
        .collect();
    if let Some(chosen) = single_signature(&fixed) {
        return Ok(ResolvedCallable::from_symbol(chosen, strategy));
    }

    Err(ResolveError::Ambiguous {
        name: name.to_string(),
        candidates: most_specific.len(),
    })
}

/// The first candidate when all candidates share one normalized signature.
fn single_signature<'s>(candidates: &[&'s CallableSymbol]) -> Option<&'s CallableSymbol> {
    let first = *candidates.first()?;
    let normalized = first.normalized_signature();
    candidates
        .iter()
        .all(|c| c.normalized_signature() == normalized)
        .then_some(first)
}

fn unsupported(node: Node<'_>) -> ResolveError {
    ResolveError::UnsupportedExpression {
        kind: node.kind().to_string(),
    }
}
