//! Canonical type descriptors.
//!
//! Normalization turns a declared [`TypeExpr`] into a [`TypeDescriptor`]: a
//! closed category (`primitive | list | enum | composite`) plus a required
//! flag. Optionality is never a category of its own; a `T | null` union
//! collapses into the inner category with `required = false`.
//!
//! Composites carry only their name. Their fields are normalized one at a
//! time during compilation, through the introspector; expanding the full
//! field set eagerly would not terminate on cyclic record graphs.

use crate::error::CompileError;
use crate::model::{FieldDecl, FieldIntrospector, TypeExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
}

impl Primitive {
    /// Canonical lowercase name, shared by the registry key derivation.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Str => "str",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Primitive(Primitive),
    List(Box<TypeDescriptor>),
    Enum { name: String, values: Vec<String> },
    Composite { name: String },
}

/// Normalized view of a declared type. Constructed fresh per field at
/// compile time; structural equality only; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub category: Category,
    pub required: bool,
}

impl TypeDescriptor {
    /// Normalize a field's declared type. A `T | null` union here demands an
    /// explicit default on the field.
    pub fn of_field(
        field: &FieldDecl,
        models: &dyn FieldIntrospector,
    ) -> Result<Self, CompileError> {
        normalize(&field.ty, models, Some(field))
    }

    /// Normalize an element position (list elements). There is no field
    /// declaration to consult, so nullable unions normalize leniently and
    /// the optional flag is dropped by render paths without element-level
    /// optionality.
    pub fn of_element(
        ty: &TypeExpr,
        models: &dyn FieldIntrospector,
    ) -> Result<Self, CompileError> {
        normalize(ty, models, None)
    }
}

fn primitive(prim: Primitive) -> Result<TypeDescriptor, CompileError> {
    Ok(TypeDescriptor {
        category: Category::Primitive(prim),
        required: true,
    })
}

fn normalize(
    ty: &TypeExpr,
    models: &dyn FieldIntrospector,
    field: Option<&FieldDecl>,
) -> Result<TypeDescriptor, CompileError> {
    match ty {
        TypeExpr::Union(members) => {
            let non_null: Vec<&TypeExpr> = members
                .iter()
                .filter(|member| !matches!(member, TypeExpr::Null))
                .collect();
            let had_null = non_null.len() != members.len();
            match (non_null.len(), had_null) {
                (1, true) => {
                    if let Some(field) = field {
                        if !field.has_default() {
                            return Err(CompileError::MissingDefault(field.name.clone()));
                        }
                    }
                    let inner = normalize(non_null[0], models, None)?;
                    Ok(TypeDescriptor {
                        required: false,
                        ..inner
                    })
                }
                // Degenerate single-member union.
                (1, false) => normalize(non_null[0], models, field),
                _ => Err(CompileError::UnsupportedType(format!(
                    "complex unions not supported: {ty}"
                ))),
            }
        }
        TypeExpr::Str => primitive(Primitive::Str),
        TypeExpr::Int => primitive(Primitive::Int),
        TypeExpr::Float => primitive(Primitive::Float),
        TypeExpr::Bool => primitive(Primitive::Bool),
        TypeExpr::List(element) => {
            let element = TypeDescriptor::of_element(element, models)?;
            Ok(TypeDescriptor {
                category: Category::List(Box::new(element)),
                required: true,
            })
        }
        TypeExpr::Named(name) => {
            if let Some(enumeration) = models.enumeration(name) {
                Ok(TypeDescriptor {
                    category: Category::Enum {
                        name: enumeration.name.clone(),
                        values: enumeration.values.clone(),
                    },
                    required: true,
                })
            } else if let Some(record) = models.record(name) {
                Ok(TypeDescriptor {
                    category: Category::Composite {
                        name: record.name.clone(),
                    },
                    required: true,
                })
            } else {
                Err(CompileError::UnsupportedType(format!("unknown type `{name}`")))
            }
        }
        TypeExpr::Null => Err(CompileError::UnsupportedType(
            "null is only supported inside a union".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumDecl, ModelDecl, ModelSet, RecordDecl};
    use serde_json::Value;

    fn models() -> ModelSet {
        let mut set = ModelSet::new();
        set.declare(ModelDecl::Enum(EnumDecl {
            name: "Color".into(),
            values: vec!["RED".into(), "BLUE".into()],
        }));
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Point".into(),
            fields: vec![
                FieldDecl::new("x", TypeExpr::Float),
                FieldDecl::new("y", TypeExpr::Float),
            ],
        }));
        set
    }

    #[test]
    fn primitives_normalize_to_required_primitive_categories() {
        let set = models();
        let field = FieldDecl::new("age", TypeExpr::Int);
        let desc = TypeDescriptor::of_field(&field, &set).unwrap();
        assert_eq!(desc.category, Category::Primitive(Primitive::Int));
        assert!(desc.required);
    }

    #[test]
    fn nullable_union_with_default_drops_required() {
        let set = models();
        let field =
            FieldDecl::new("note", TypeExpr::Str.nullable()).with_default(Value::Null);
        let desc = TypeDescriptor::of_field(&field, &set).unwrap();
        assert_eq!(desc.category, Category::Primitive(Primitive::Str));
        assert!(!desc.required);
    }

    #[test]
    fn nullable_union_without_default_is_missing_default() {
        let set = models();
        let field = FieldDecl::new("note", TypeExpr::Str.nullable());
        let err = TypeDescriptor::of_field(&field, &set).unwrap_err();
        match err {
            CompileError::MissingDefault(name) => assert_eq!(name, "note"),
            other => panic!("expected MissingDefault, got {other:?}"),
        }
    }

    #[test]
    fn complex_union_is_rejected() {
        let set = models();
        let field = FieldDecl::new(
            "value",
            TypeExpr::Union(vec![TypeExpr::Str, TypeExpr::Int, TypeExpr::Null]),
        )
        .with_default(Value::Null);
        let err = TypeDescriptor::of_field(&field, &set).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedType(_)));
    }

    #[test]
    fn element_position_allows_nullable_without_default() {
        let set = models();
        let desc = TypeDescriptor::of_element(&TypeExpr::Str.nullable(), &set).unwrap();
        assert_eq!(desc.category, Category::Primitive(Primitive::Str));
        assert!(!desc.required);
    }

    #[test]
    fn named_references_resolve_to_enum_and_composite() {
        let set = models();
        let color = TypeDescriptor::of_element(&TypeExpr::named("Color"), &set).unwrap();
        assert_eq!(
            color.category,
            Category::Enum {
                name: "Color".into(),
                values: vec!["RED".into(), "BLUE".into()],
            }
        );
        let point = TypeDescriptor::of_element(&TypeExpr::named("Point"), &set).unwrap();
        assert_eq!(point.category, Category::Composite { name: "Point".into() });
    }

    #[test]
    fn unknown_name_and_bare_null_are_unsupported() {
        let set = models();
        let unknown = TypeDescriptor::of_element(&TypeExpr::named("Ghost"), &set);
        assert!(matches!(unknown, Err(CompileError::UnsupportedType(_))));

        let bare_null = TypeDescriptor::of_element(&TypeExpr::Null, &set);
        assert!(matches!(bare_null, Err(CompileError::UnsupportedType(_))));
    }

    #[test]
    fn nested_list_normalizes_recursively() {
        let set = models();
        let ty = TypeExpr::list(TypeExpr::list(TypeExpr::Bool));
        let desc = TypeDescriptor::of_element(&ty, &set).unwrap();
        let Category::List(inner) = &desc.category else {
            panic!("expected list");
        };
        let Category::List(leaf) = &inner.category else {
            panic!("expected nested list");
        };
        assert_eq!(leaf.category, Category::Primitive(Primitive::Bool));
    }
}
