//! MethodKey: comparable identity of a callable across two parses.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use comply_core::errors::RuleError;

use super::signature::Signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Method,
    Constructor,
}

impl MethodKind {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Method => "::method::",
            Self::Constructor => "::constructor::",
        }
    }
}

/// `LinkedBag::method::add(T)`: class name, kind marker, canonical signature.
///
/// Two keys are equal exactly when their derived strings are equal.
#[derive(Debug, Clone)]
pub struct MethodKey {
    class_name: String,
    kind: MethodKind,
    signature: String,
    key: String,
}

impl MethodKey {
    /// `signature` must already be canonical.
    pub fn new(class_name: &str, kind: MethodKind, signature: &str) -> Self {
        let key = format!("{}{}{}", class_name, kind.marker(), signature);
        Self {
            class_name: class_name.to_string(),
            kind,
            signature: signature.to_string(),
            key,
        }
    }

    /// Synthesize a key from bare signature text. The callable is a
    /// constructor when its name is the class name.
    pub fn from_signature(class_name: &str, signature: &str) -> Result<Self, RuleError> {
        let parsed = Signature::parse(signature)?;
        let kind = if parsed.name == class_name {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        };
        Ok(Self::new(class_name, kind, &parsed.canonical()))
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl PartialEq for MethodKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MethodKey {}

impl Hash for MethodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for MethodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MethodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Serialized as the key string so it can be a JSON object key.
impl Serialize for MethodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signature_detects_constructors() {
        let ctor = MethodKey::from_signature("LinkedBag", "LinkedBag(BagInterface<T> other)").unwrap();
        assert_eq!(ctor.kind(), MethodKind::Constructor);
        assert_eq!(ctor.as_str(), "LinkedBag::constructor::LinkedBag(BagInterface<T>)");

        let method = MethodKey::from_signature("LinkedBag", "add( T newEntry )").unwrap();
        assert_eq!(method.kind(), MethodKind::Method);
        assert_eq!(method.as_str(), "LinkedBag::method::add(T)");
    }

    #[test]
    fn test_equality_is_by_derived_key() {
        let a = MethodKey::new("Bag", MethodKind::Method, "add(T)");
        let b = MethodKey::from_signature("Bag", "add(T entry)").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, MethodKey::new("Other", MethodKind::Method, "add(T)"));
    }
}
