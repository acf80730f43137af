//! Method inventory: every callable of one class, keyed by `MethodKey`.

use std::collections::BTreeMap;

use comply_core::config::AnalysisConfig;

use super::info::MethodInfo;
use super::key::MethodKey;
use crate::parsers::{CompilationUnit, TypeDecl};

/// Ordered so reports list methods deterministically.
pub type MethodMap = BTreeMap<MethodKey, MethodInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryOptions {
    pub strip_comments: bool,
    pub include_nested_types: bool,
}

impl InventoryOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            strip_comments: config.effective_strip_comments(),
            include_nested_types: config.effective_include_nested_types(),
        }
    }
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            strip_comments: true,
            include_nested_types: false,
        }
    }
}

/// Collect the methods and constructors declared in `decl`.
///
/// Nested types contribute under their own class name when enabled.
/// A duplicate key keeps the first declaration.
pub fn collect_methods(
    unit: &CompilationUnit,
    decl: &TypeDecl<'_>,
    options: InventoryOptions,
) -> MethodMap {
    let mut methods = MethodMap::new();
    collect_into(unit, decl, options, &mut methods);
    tracing::debug!(
        path = %unit.path.display(),
        class = %decl.name,
        method_count = methods.len(),
        "collected method inventory"
    );
    methods
}

fn collect_into(
    unit: &CompilationUnit,
    decl: &TypeDecl<'_>,
    options: InventoryOptions,
    methods: &mut MethodMap,
) {
    for node in decl.callables() {
        let Some(info) = MethodInfo::from_node(unit, node, &decl.name, options.strip_comments)
        else {
            continue;
        };
        let key = info.key();
        if methods.contains_key(&key) {
            tracing::warn!(
                path = %unit.path.display(),
                key = %key,
                line = info.line,
                "duplicate method declaration, keeping the first"
            );
            continue;
        }
        methods.insert(key, info);
    }

    if options.include_nested_types {
        for nested in decl.nested_types(unit.bytes()) {
            collect_into(unit, &nested, options, methods);
        }
    }
}
