//! Object creation matching: `new X(...)` against a constructor signature.

use comply_core::errors::RuleError;

use crate::methods::signature::normalize_signature;
use crate::parsers::syntax;

use super::resolution::Resolver;
use super::CallableContext;

/// True iff the body creates an object through a constructor matching
/// `signature`.
pub fn instantiates_class_with_signature(ctx: &CallableContext<'_>, signature: &str) -> Result<bool, RuleError> {
    Ok(times_class_instantiated_with_signature_called(ctx, signature)? > 0)
}

/// Number of object creation expressions in the body that resolve to a
/// constructor matching `signature`. Creations inside lambdas and anonymous
/// class bodies count.
pub fn times_class_instantiated_with_signature_called(
    ctx: &CallableContext<'_>,
    signature: &str,
) -> Result<usize, RuleError> {
    let target = normalize_signature(signature)?;
    let Some(body) = ctx.body() else {
        return Ok(0);
    };
    let resolver = Resolver::new(ctx);

    let mut count = 0;
    for creation in syntax::descendants_of_kind(body, syntax::OBJECT_CREATION_EXPRESSION) {
        match resolver.resolve_object_creation(creation) {
            Ok(resolved) if resolved.normalized == target => count += 1,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    callable = %ctx.display_name(),
                    creation = %syntax::node_text(&creation, ctx.source()),
                    error = %e,
                    "unresolved instantiation treated as non-match"
                );
            }
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::heuristics::SymbolTable;
    use crate::parsers::JavaParser;

    const SOURCE: &str = r#"
public class LinkedBag<T> implements BagInterface<T> {
    public LinkedBag() { }
    public LinkedBag(BagInterface<T> other) { }
    public LinkedBag(T[] entries) { }

    public BagInterface<T> union(BagInterface<T> other) {
        BagInterface<T> result = new LinkedBag<>(this);
        BagInterface<T> copy = new LinkedBag<T>(other);
        return new LinkedBag<>();
    }
}
interface BagInterface<T> { }
"#;

    #[test]
    fn test_counts_matching_creations() {
        let unit = JavaParser::new()
            .unwrap()
            .parse(SOURCE.to_string(), Path::new("LinkedBag.java"))
            .unwrap();
        let symbols = SymbolTable::from_units([&unit]);
        let decl = unit.find_type("LinkedBag").unwrap();
        let union = decl.callables()[3];
        let ctx = CallableContext::new(&unit, union, &decl.name, &symbols);

        assert_eq!(times_class_instantiated_with_signature_called(&ctx, "LinkedBag(BagInterface)").unwrap(), 2);
        assert_eq!(times_class_instantiated_with_signature_called(&ctx, "LinkedBag()").unwrap(), 1);
        assert!(!instantiates_class_with_signature(&ctx, "LinkedBag(T[])").unwrap());
        assert!(instantiates_class_with_signature(&ctx, "java.util.LinkedBag(Object)").unwrap());
    }
}
