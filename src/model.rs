//! Declarative model layer.
//!
//! This is the boundary between host declarations and the grammar compiler:
//! a small closed type algebra (`TypeExpr`), ordered field/record/enum
//! declarations, and the `FieldIntrospector` capability the compiler core
//! depends on. Composites and enums are referenced *by name* and resolved
//! through the introspector, which is what makes self-referential and
//! mutually-referential record graphs expressible.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// A field's or element's declared type, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Str,
    Int,
    Float,
    Bool,
    /// Only meaningful inside a union; a bare `null` type is rejected at
    /// normalization.
    Null,
    List(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    /// Reference to a declared record or enum, resolved through the
    /// [`FieldIntrospector`].
    Named(String),
}

impl TypeExpr {
    pub fn list(element: TypeExpr) -> Self {
        TypeExpr::List(Box::new(element))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    /// Wrap as `self | null`.
    pub fn nullable(self) -> Self {
        TypeExpr::Union(vec![self, TypeExpr::Null])
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Str => f.write_str("str"),
            TypeExpr::Int => f.write_str("int"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::Null => f.write_str("null"),
            TypeExpr::List(element) => write!(f, "list[{element}]"),
            TypeExpr::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            TypeExpr::Named(name) => f.write_str(name),
        }
    }
}

/// One declared field: name, type, and the host declaration's default.
///
/// `default` distinguishes "no default declared" (`None`) from "declared
/// default of null" (`Some(Value::Null)`); the latter is how optional fields
/// are made intentional.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        FieldDecl {
            name: name.into(),
            ty,
            default: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A composite record: fixed, ordered set of named, typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

/// An enumeration: ordered literal values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelDecl {
    Record(RecordDecl),
    Enum(EnumDecl),
}

impl ModelDecl {
    pub fn name(&self) -> &str {
        match self {
            ModelDecl::Record(record) => &record.name,
            ModelDecl::Enum(enumeration) => &enumeration.name,
        }
    }
}

/// Ordered access to declared shapes by name.
///
/// The compiler core depends only on this trait, never on a concrete
/// declaration mechanism (manifest files, hand-built sets, ...).
pub trait FieldIntrospector {
    fn record(&self, name: &str) -> Option<&RecordDecl>;
    fn enumeration(&self, name: &str) -> Option<&EnumDecl>;
}

/// The standard introspector: one shared, insertion-ordered namespace for
/// records and enums.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    decls: IndexMap<String, ModelDecl>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Returns false (leaving the set unchanged) when the
    /// name is already taken; records and enums share one namespace.
    pub fn declare(&mut self, decl: ModelDecl) -> bool {
        if self.decls.contains_key(decl.name()) {
            return false;
        }
        self.decls.insert(decl.name().to_string(), decl);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ModelDecl> {
        self.decls.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDecl> {
        self.decls.values()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl FieldIntrospector for ModelSet {
    fn record(&self, name: &str) -> Option<&RecordDecl> {
        match self.decls.get(name) {
            Some(ModelDecl::Record(record)) => Some(record),
            _ => None,
        }
    }

    fn enumeration(&self, name: &str) -> Option<&EnumDecl> {
        match self.decls.get(name) {
            Some(ModelDecl::Enum(enumeration)) => Some(enumeration),
            _ => None,
        }
    }
}
