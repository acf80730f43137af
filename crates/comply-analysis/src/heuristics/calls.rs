//! Does a callable call a method or chain to a constructor with a given
//! signature?

use comply_core::errors::{ComplianceError, RuleError};

use crate::methods::signature::normalize_signature;
use crate::parsers::syntax::{self, WalkAction};

use super::resolution::Resolver;
use super::CallableContext;

/// True iff a method invocation in the body resolves to a declaration whose
/// normalized signature equals that of `signature`.
pub fn calls_method_with_signature(ctx: &CallableContext<'_>, signature: &str) -> Result<bool, RuleError> {
    let target = normalize_signature(signature)?;
    let Some(body) = ctx.body() else {
        return Ok(false);
    };
    let resolver = Resolver::new(ctx);

    for call in syntax::descendants_of_kind(body, syntax::METHOD_INVOCATION) {
        match resolver.resolve_method_call(call) {
            Ok(resolved) if resolved.normalized == target => {
                tracing::debug!(
                    callable = %ctx.display_name(),
                    target = %target,
                    strategy = resolved.strategy.name(),
                    line = call.start_position().row + 1,
                    "matched method call"
                );
                return Ok(true);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    callable = %ctx.display_name(),
                    call = %syntax::node_text(&call, ctx.source()),
                    error = %e,
                    "unresolved call treated as non-match"
                );
            }
        }
    }
    Ok(false)
}

/// True iff the body's `this(...)`/`super(...)` call resolves to a
/// constructor matching `signature`.
///
/// More than one explicit constructor invocation in a single body cannot
/// come from valid Java and is reported as an error.
pub fn calls_constructor_with_signature(
    ctx: &CallableContext<'_>,
    signature: &str,
) -> Result<bool, ComplianceError> {
    let target = normalize_signature(signature)?;
    let Some(body) = ctx.body() else {
        return Ok(false);
    };

    let mut invocations = Vec::new();
    syntax::walk(body, |node| {
        if node.kind() == "class_body" {
            return WalkAction::Skip;
        }
        if node.kind() == syntax::EXPLICIT_CONSTRUCTOR_INVOCATION {
            invocations.push(node);
        }
        WalkAction::Descend
    });

    let Some(invocation) = at_most_one(&invocations, ctx)? else {
        return Ok(false);
    };
    match Resolver::new(ctx).resolve_constructor_invocation(invocation) {
        Ok(resolved) => Ok(resolved.normalized == target),
        Err(e) => {
            tracing::debug!(
                callable = %ctx.display_name(),
                error = %e,
                "unresolved constructor invocation treated as non-match"
            );
            Ok(false)
        }
    }
}

fn at_most_one<T: Copy>(items: &[T], ctx: &CallableContext<'_>) -> Result<Option<T>, ComplianceError> {
    match items {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        many => Err(ComplianceError::MultipleConstructorCalls {
            constructor: ctx.display_name(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::heuristics::SymbolTable;
    use crate::parsers::{CompilationUnit, JavaParser};

    fn parse(src: &str) -> CompilationUnit {
        JavaParser::new()
            .unwrap()
            .parse(src.to_string(), Path::new("Bag.java"))
            .unwrap()
    }

    fn with_callable<R>(src: &str, index: usize, f: impl FnOnce(&CallableContext<'_>) -> R) -> R {
        let unit = parse(src);
        let symbols = SymbolTable::from_units([&unit]);
        let decl = unit.primary_type().unwrap();
        let node = decl.callables()[index];
        let ctx = CallableContext::new(&unit, node, &decl.name, &symbols);
        f(&ctx)
    }

    const BAG: &str = r#"
class Bag<T> {
    private T[] items;
    public Bag() { this(10); }
    public Bag(int capacity) { items = null; }
    public boolean add(T entry) { return true; }
    public boolean add(T[] entries) { return true; }
    public void fill(T x) { add(x); }
    public void fillAll(T[] xs) { this.add(xs); }
    public void fillLiteral() { add(new String[] { "a" }); }
}
"#;

    #[test]
    fn test_scalar_argument_picks_scalar_overload() {
        with_callable(BAG, 4, |ctx| {
            assert!(calls_method_with_signature(ctx, "add(T)").unwrap());
            assert!(calls_method_with_signature(ctx, "add(Object)").unwrap());
            assert!(!calls_method_with_signature(ctx, "add(T[])").unwrap());
        });
    }

    #[test]
    fn test_array_argument_picks_array_overload() {
        with_callable(BAG, 5, |ctx| {
            assert!(calls_method_with_signature(ctx, "add(T[])").unwrap());
            assert!(!calls_method_with_signature(ctx, "add(T)").unwrap());
        });
        with_callable(BAG, 6, |ctx| {
            assert!(calls_method_with_signature(ctx, "add(Object[])").unwrap());
        });
    }

    #[test]
    fn test_different_arity_does_not_match() {
        with_callable(BAG, 4, |ctx| {
            assert!(!calls_method_with_signature(ctx, "add(T, int)").unwrap());
        });
    }

    #[test]
    fn test_external_calls_only_when_enabled() {
        let src = "class A { void f(String s) { System.out.println(s); } }";
        with_callable(src, 0, |ctx| {
            assert!(!calls_method_with_signature(ctx, "println(String)").unwrap());
            let external = ctx.with_external_calls(true);
            assert!(calls_method_with_signature(&external, "println(String)").unwrap());
        });
    }

    #[test]
    fn test_constructor_chaining() {
        with_callable(BAG, 0, |ctx| {
            assert!(calls_constructor_with_signature(ctx, "Bag(int)").unwrap());
            assert!(!calls_constructor_with_signature(ctx, "Bag()").unwrap());
        });
        with_callable(BAG, 1, |ctx| {
            assert!(!calls_constructor_with_signature(ctx, "Bag(int)").unwrap());
        });
    }

    #[test]
    fn test_super_resolves_to_superclass() {
        let src = "class Base { Base(int[] data) {} } class Child extends Base { Child() { super(new int[3]); } }";
        let unit = parse(src);
        let symbols = SymbolTable::from_units([&unit]);
        let child = unit.find_type("Child").unwrap();
        let ctx = CallableContext::new(&unit, child.callables()[0], &child.name, &symbols);
        assert!(calls_constructor_with_signature(&ctx, "Base(int[])").unwrap());
        assert!(!calls_constructor_with_signature(&ctx, "Base(int)").unwrap());
    }

    #[test]
    fn test_multiple_constructor_invocations_are_an_error() {
        with_callable(BAG, 0, |ctx| {
            assert_eq!(at_most_one::<u8>(&[], ctx).unwrap(), None);
            assert_eq!(at_most_one(&[7u8], ctx).unwrap(), Some(7));
            let err = at_most_one(&[1u8, 2], ctx).unwrap_err();
            assert!(matches!(
                err,
                ComplianceError::MultipleConstructorCalls { ref constructor, count: 2 } if constructor == "Bag.Bag"
            ));
        });
    }
}
