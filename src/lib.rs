//! Compile declarative, statically-typed data models into textual
//! context-free grammars for constrained generation.
//!
//! A model is a set of composite records (named, typed, ordered fields),
//! enumerations, lists and nullable unions. Compiling a record walks its
//! type graph depth-first and emits one deduplicated grammar rule per
//! distinct type, in first-encounter order, in a chosen target dialect
//! (GBNF for grammar-constrained samplers; EBNF/Lark for parser
//! generators).
//!
//! Design notes:
//! - Normalization is total and closed: every declared type becomes one of
//!   `primitive | list | enum | composite`, or the compilation fails.
//!   Optionality is a field-level flag, never a rule.
//! - The rule registry is an owned, insertion-ordered accumulator threaded
//!   through the recursion; composites reserve their name before their
//!   fields compile, which is what makes cyclic record graphs terminate.
//! - Dialects are pure renderers behind one strategy trait; adding a
//!   dialect never touches the compiler.

pub mod cli;
pub mod compiler;
pub mod descriptor;
pub mod dialect;
pub mod error;
pub mod manifest;
pub mod model;
pub mod registry;
pub mod report;

pub use compiler::{GrammarCompiler, RecordCompiler, compile_record};
pub use descriptor::{Category, Primitive, TypeDescriptor};
pub use dialect::{EbnfDialect, GbnfDialect, GrammarDialect};
pub use error::CompileError;
pub use manifest::{Manifest, ManifestError};
pub use model::{
    EnumDecl, FieldDecl, FieldIntrospector, ModelDecl, ModelSet, RecordDecl, TypeExpr,
};
pub use registry::RuleRegistry;
pub use report::semantic_report;
