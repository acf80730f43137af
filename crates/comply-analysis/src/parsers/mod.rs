//! Tree-sitter Java parsing.

pub mod error_tolerant;
pub mod java;
pub mod syntax;
pub mod types;

pub use java::{CompilationUnit, FieldDecl, JavaParser, TypeDecl, TypeKind};
pub use types::{AstHandle, Position, Range};
