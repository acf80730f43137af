//! Statement-level facts: exception handling and variable access.

use tree_sitter::Node;

use crate::methods::signature::simple_type_name;
use crate::parsers::syntax::{self, node_text, WalkAction};

use super::scope::LocalScope;
use super::CallableContext;

/// Variable name from a rule target: `this.count` -> `count`.
pub fn variable_name(target: &str) -> &str {
    let trimmed = target.trim();
    trimmed.strip_prefix("this.").unwrap_or(trimmed).trim()
}

/// A `throw` statement exists; with a type, the thrown type matches it.
pub fn throws(ctx: &CallableContext<'_>, exception_type: Option<&str>) -> bool {
    let Some(body) = ctx.body() else {
        return false;
    };
    let throws = syntax::descendants_of_kind(body, "throw_statement");
    let Some(wanted) = exception_type.map(simple_type_name) else {
        return !throws.is_empty();
    };

    let scope = LocalScope::of_callable(ctx.node, ctx.source());
    throws.into_iter().any(|stmt| {
        let Some(thrown) = syntax::named_children(stmt).into_iter().next() else {
            return false;
        };
        let thrown_type = match thrown.kind() {
            "object_creation_expression" => thrown
                .child_by_field_name("type")
                .map(|t| simple_type_name(node_text(&t, ctx.source()))),
            "identifier" => scope
                .type_of(node_text(&thrown, ctx.source()))
                .map(simple_type_name),
            _ => None,
        };
        thrown_type.as_deref() == Some(wanted.as_str())
    })
}

/// A catch clause exists; with a type, one clause catches it.
pub fn catches(ctx: &CallableContext<'_>, exception_type: Option<&str>) -> bool {
    let Some(body) = ctx.body() else {
        return false;
    };
    let clauses = syntax::descendants_of_kind(body, "catch_clause");
    let Some(wanted) = exception_type.map(simple_type_name) else {
        return !clauses.is_empty();
    };

    clauses.into_iter().any(|clause| {
        syntax::descendants_of_kind(clause, "catch_type")
            .into_iter()
            .flat_map(syntax::named_children)
            .any(|ty| simple_type_name(node_text(&ty, ctx.source())) == wanted)
    })
}

/// Any `try` statement, with or without resources.
pub fn has_try(ctx: &CallableContext<'_>) -> bool {
    has_any(ctx, &["try_statement", "try_with_resources_statement"])
}

pub fn has_try_with_resources(ctx: &CallableContext<'_>) -> bool {
    has_any(ctx, &["try_with_resources_statement"])
}

pub fn has_finally(ctx: &CallableContext<'_>) -> bool {
    has_any(ctx, &["finally_clause"])
}

fn has_any(ctx: &CallableContext<'_>, kinds: &[&str]) -> bool {
    let Some(body) = ctx.body() else {
        return false;
    };
    let mut found = false;
    syntax::walk(body, |node| {
        if found {
            return WalkAction::Skip;
        }
        found = kinds.contains(&node.kind());
        WalkAction::Descend
    });
    found
}

/// The variable is referenced anywhere in the body.
pub fn uses_variable(ctx: &CallableContext<'_>, target: &str) -> bool {
    !references(ctx, variable_name(target)).is_empty()
}

/// The variable's value is read: any reference other than the left side
/// of a plain `=` assignment. Compound assignments and `++`/`--` read too.
pub fn reads_variable(ctx: &CallableContext<'_>, target: &str) -> bool {
    references(ctx, variable_name(target))
        .into_iter()
        .any(|r| !is_plain_assignment_target(r))
}

/// The variable is assigned or incremented/decremented.
pub fn writes_variable(ctx: &CallableContext<'_>, target: &str) -> bool {
    references(ctx, variable_name(target))
        .into_iter()
        .any(|r| is_assignment_target(r) || is_update_operand(r))
}

/// A local variable (including loop and resource variables) named `target`
/// is declared in the body.
pub fn defines_local(ctx: &CallableContext<'_>, target: &str) -> bool {
    let Some(body) = ctx.body() else {
        return false;
    };
    let name = variable_name(target);
    let mut found = false;
    syntax::walk(body, |node| {
        if found || node.kind() == "class_body" {
            return WalkAction::Skip;
        }
        let declared = match node.kind() {
            "local_variable_declaration" => {
                let mut cursor = node.walk();
                let hit = node
                    .children_by_field_name("declarator", &mut cursor)
                    .filter_map(|d| d.child_by_field_name("name"))
                    .any(|n| node_text(&n, ctx.source()) == name);
                hit
            }
            "enhanced_for_statement" | "resource" => node
                .child_by_field_name("name")
                .is_some_and(|n| node_text(&n, ctx.source()) == name),
            _ => false,
        };
        found = declared;
        WalkAction::Descend
    });
    found
}

/// Expression nodes denoting the variable: bare identifiers and
/// `this.name` field accesses. Declarations, method names and fields of
/// other objects are excluded.
fn references<'a>(ctx: &CallableContext<'a>, name: &str) -> Vec<Node<'a>> {
    let Some(body) = ctx.body() else {
        return Vec::new();
    };
    let mut found = Vec::new();
    syntax::walk(body, |node| {
        if node.kind() != "identifier" || node_text(&node, ctx.source()) != name {
            return WalkAction::Descend;
        }
        let Some(parent) = node.parent() else {
            return WalkAction::Descend;
        };
        let is_field_of = |field: &str| {
            parent
                .child_by_field_name(field)
                .is_some_and(|f| f.id() == node.id())
        };
        match parent.kind() {
            "method_invocation" if is_field_of("name") => {}
            "field_access" if is_field_of("field") => {
                let on_this = parent
                    .child_by_field_name("object")
                    .is_some_and(|o| o.kind() == "this");
                if on_this {
                    found.push(parent);
                }
            }
            "variable_declarator"
            | "formal_parameter"
            | "catch_formal_parameter"
            | "enhanced_for_statement"
            | "resource"
                if is_field_of("name") => {}
            "inferred_parameters" | "labeled_statement" | "break_statement" | "continue_statement" => {}
            "lambda_expression" if is_field_of("parameters") => {}
            _ => found.push(node),
        }
        WalkAction::Descend
    });
    found
}

fn is_assignment_target(node: Node<'_>) -> bool {
    node.parent().is_some_and(|p| {
        p.kind() == "assignment_expression"
            && p.child_by_field_name("left").is_some_and(|l| l.id() == node.id())
    })
}

fn is_plain_assignment_target(node: Node<'_>) -> bool {
    is_assignment_target(node)
        && node
            .parent()
            .and_then(|p| p.child_by_field_name("operator"))
            .is_some_and(|op| op.kind() == "=")
}

fn is_update_operand(node: Node<'_>) -> bool {
    node.parent().is_some_and(|p| p.kind() == "update_expression")
}
