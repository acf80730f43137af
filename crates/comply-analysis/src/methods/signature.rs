//! Signature text handling: canonical form for map keys and the
//! normalized form used for call matching.
//!
//! Canonical: `union(BagInterface<T>)` (no whitespace, no parameter names).
//! Normalized: `union(*)`; every array or varargs parameter becomes `[]`,
//! every other parameter becomes `*`.

use std::fmt;

use comply_core::errors::RuleError;

pub const ARRAY_MARKER: &str = "[]";
pub const WILDCARD_MARKER: &str = "*";

/// A parsed `name(T1, T2)` signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub params: Vec<String>,
}

impl Signature {
    /// Parse signature text. Package or class qualification on the name is
    /// dropped, as are parameter names, modifiers, and annotations.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let invalid = |message: &str| RuleError::InvalidSignature {
            signature: text.to_string(),
            message: message.to_string(),
        };

        let trimmed = text.trim();
        let open = trimmed.find('(').ok_or_else(|| invalid("missing '('"))?;
        if !trimmed.ends_with(')') {
            return Err(invalid("missing closing ')'"));
        }

        let name = simple_name(&trimmed[..open]);
        if name.is_empty() {
            return Err(invalid("missing name"));
        }

        let inner = &trimmed[open + 1..trimmed.len() - 1];
        if depth_of(inner) != 0 {
            return Err(invalid("unbalanced brackets"));
        }
        let params = split_top_level(inner, ',')
            .into_iter()
            .map(canonical_param)
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self { name, params })
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn canonical(&self) -> String {
        format!("{}({})", self.name, self.params.join(","))
    }

    pub fn normalized(&self) -> String {
        let markers: Vec<&str> = self.params.iter().map(|p| param_marker(p)).collect();
        format!("{}({})", self.name, markers.join(","))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Canonical form of signature text, or the whitespace-stripped text if it
/// does not parse as a signature.
pub fn canonical_signature(text: &str) -> String {
    match Signature::parse(text) {
        Ok(sig) => sig.canonical(),
        Err(_) => text.chars().filter(|c| !c.is_whitespace()).collect(),
    }
}

/// Normalized form of signature text. Idempotent.
pub fn normalize_signature(text: &str) -> Result<String, RuleError> {
    Signature::parse(text).map(|sig| sig.normalized())
}

/// Build a normalized signature from a name and per-parameter array flags.
pub fn normalized_from_parts(name: &str, array_params: impl IntoIterator<Item = bool>) -> String {
    let markers: Vec<&str> = array_params
        .into_iter()
        .map(|is_array| if is_array { ARRAY_MARKER } else { WILDCARD_MARKER })
        .collect();
    format!("{}({})", simple_name(name), markers.join(","))
}

/// Whether parameter or type text denotes an array (including varargs).
/// Brackets inside type arguments do not count: `List<int[]>` is scalar.
pub fn is_array_type(text: &str) -> bool {
    let stripped = strip_type_arguments(text);
    stripped.contains('[') || stripped.contains("...")
}

fn param_marker(param: &str) -> &'static str {
    if is_array_type(param) {
        ARRAY_MARKER
    } else {
        WILDCARD_MARKER
    }
}

/// `java.util.Arrays.copyOf` -> `copyOf`, `LinkedBag<T>` -> `LinkedBag`.
pub fn simple_name(text: &str) -> String {
    let stripped = strip_type_arguments(text);
    let trimmed = stripped.trim().trim_end_matches("...");
    trimmed
        .rsplit('.')
        .next()
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Simple class name of a type: drops qualification, type arguments,
/// and array dimensions. `java.util.List<T>[]` -> `List`.
pub fn simple_type_name(text: &str) -> String {
    let name = simple_name(text);
    name.split(|c: char| c == '[' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_string()
}

/// Remove everything between matching `<` `>` pairs.
pub fn strip_type_arguments(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Drop modifiers, annotations, and the parameter name; keep the type with
/// any C-style dimensions (`int a[]` -> `int[]`). Whitespace is removed.
fn canonical_param(param: &str) -> String {
    let tokens: Vec<&str> = split_top_level_whitespace(param)
        .into_iter()
        .filter(|t| !t.starts_with('@') && *t != "final")
        .collect();

    let type_text = match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && starts_like_identifier(last) => {
            // `last` is the parameter name, possibly with C-style dimensions.
            let dims = last.find('[').map(|i| &last[i..]).unwrap_or("");
            format!("{}{}", rest.concat(), dims)
        }
        _ => tokens.concat(),
    };

    type_text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn starts_like_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
}

fn depth_of(text: &str) -> i32 {
    text.chars().fold(0, |depth, c| match c {
        '<' | '(' | '[' => depth + 1,
        '>' | ')' | ']' => depth - 1,
        _ => depth,
    })
}

/// Split on `sep` where not nested inside `<>`, `()` or `[]`.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn split_top_level_whitespace(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                parts.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        parts.push(&text[s..]);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_drops_names_and_whitespace() {
        assert_eq!(canonical_signature("union( BagInterface<T> anotherBag )"), "union(BagInterface<T>)");
        assert_eq!(canonical_signature("put(K key, V value)"), "put(K,V)");
        assert_eq!(canonical_signature("put(Map<K, V> m)"), "put(Map<K,V>)");
        assert_eq!(canonical_signature("sort(final int a[])"), "sort(int[])");
        assert_eq!(canonical_signature("log(String... parts)"), "log(String...)");
        assert_eq!(canonical_signature("clear()"), "clear()");
    }

    #[test]
    fn test_normalization_collapses_parameter_types() {
        assert_eq!(normalize_signature("add(T)").unwrap(), "add(*)");
        assert_eq!(normalize_signature("add(Object)").unwrap(), "add(*)");
        assert_eq!(normalize_signature("addAll(T[])").unwrap(), "addAll([])");
        assert_eq!(normalize_signature("log(String...)").unwrap(), "log([])");
        assert_eq!(normalize_signature("put(Map<String[], T>)").unwrap(), "put(*)");
    }

    #[test]
    fn test_normalization_strips_qualification() {
        assert_eq!(
            normalize_signature("java.util.Arrays.copyOf(T[], int)").unwrap(),
            "copyOf([],*)"
        );
        assert_eq!(
            normalize_signature("LinkedBag<T>(BagInterface<T>)").unwrap(),
            "LinkedBag(*)"
        );
    }

    #[test]
    fn test_normalization_is_idempotent_on_markers() {
        assert_eq!(normalize_signature("add(*)").unwrap(), "add(*)");
        assert_eq!(normalize_signature("addAll([],*)").unwrap(), "addAll([],*)");
    }

    #[test]
    fn test_malformed_signatures_are_rejected() {
        assert!(Signature::parse("add").is_err());
        assert!(Signature::parse("add(T").is_err());
        assert!(Signature::parse("(T)").is_err());
        assert!(Signature::parse("add(Map<K,V)").is_err());
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("java.util.List<T>[]"), "List");
        assert_eq!(simple_type_name("LinkedBag<>"), "LinkedBag");
        assert_eq!(simple_type_name("Node"), "Node");
        assert_eq!(simple_type_name("String..."), "String");
    }
}
