//! JSON model manifests.
//!
//! A manifest declares enums and records in a compact JSON shape; it is how
//! the CLI gets models without host-language reflection. Declaration order
//! is semantically significant all the way into the emitted grammar, so
//! records and their field maps deserialize into `IndexMap`.
//!
//! Field types use a small textual syntax: `str`, `int`, `float`, `bool`,
//! `null`, `list[T]`, `A | B` unions, and bare identifiers as references to
//! declared records or enums.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::model::{EnumDecl, FieldDecl, ModelDecl, ModelSet, RecordDecl, TypeExpr};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("field `{record}.{field}`: {message}")]
    TypeSyntax {
        record: String,
        field: String,
        message: String,
    },

    #[error("`{0}` is not a valid model name (use letters, digits and underscores)")]
    InvalidName(String),

    #[error("duplicate model name `{0}`")]
    DuplicateName(String),
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Record to compile when the caller names none.
    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub enums: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub records: IndexMap<String, IndexMap<String, FieldSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Bare type expression, e.g. `"list[str]"`.
    Type(String),
    /// Full form with default and/or description.
    Detailed {
        #[serde(rename = "type")]
        type_: String,
        /// An explicit JSON `null` here is a *present* default; that is how
        /// optional fields are declared intentional.
        #[serde(default, deserialize_with = "some_value")]
        default: Option<Value>,
        #[serde(default)]
        description: Option<String>,
    },
}

/// Keep an explicit `null` as a present value; only an absent key is `None`.
fn some_value<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

impl Manifest {
    /// Parse manifest JSON, with JSON-path context in error messages.
    pub fn from_json(src: &str) -> Result<Self, ManifestError> {
        let de = &mut serde_json::Deserializer::from_str(src);
        serde_path_to_error::deserialize(de).map_err(|err| ManifestError::Parse {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        })
    }

    /// Fold this manifest's declarations into `set`. Several manifests may
    /// declare into one set; names must stay unique across all of them.
    pub fn declare_into(self, set: &mut ModelSet) -> Result<(), ManifestError> {
        for (name, values) in self.enums {
            check_name(&name)?;
            let decl = ModelDecl::Enum(EnumDecl {
                name: name.clone(),
                values,
            });
            if !set.declare(decl) {
                return Err(ManifestError::DuplicateName(name));
            }
        }
        for (name, fields) in self.records {
            check_name(&name)?;
            let mut decls = Vec::with_capacity(fields.len());
            for (field_name, spec) in fields {
                decls.push(spec.into_field(&name, field_name)?);
            }
            let decl = ModelDecl::Record(RecordDecl {
                name: name.clone(),
                fields: decls,
            });
            if !set.declare(decl) {
                return Err(ManifestError::DuplicateName(name));
            }
        }
        Ok(())
    }
}

impl FieldSpec {
    fn into_field(self, record: &str, name: String) -> Result<FieldDecl, ManifestError> {
        let (type_src, default, description) = match self {
            FieldSpec::Type(type_src) => (type_src, None, None),
            FieldSpec::Detailed {
                type_,
                default,
                description,
            } => (type_, default, description),
        };
        let ty = parse_type_expr(&type_src).map_err(|message| ManifestError::TypeSyntax {
            record: record.to_string(),
            field: name.clone(),
            message,
        })?;
        Ok(FieldDecl {
            name,
            ty,
            default,
            description,
        })
    }
}

/// Declared names become grammar rule names; keep them identifier-shaped.
fn check_name(name: &str) -> Result<(), ManifestError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ManifestError::InvalidName(name.to_string()))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE EXPRESSION SYNTAX
// ————————————————————————————————————————————————————————————————————————————

/// Parse the compact field-type syntax into a [`TypeExpr`].
pub fn parse_type_expr(src: &str) -> Result<TypeExpr, String> {
    let mut parser = Parser { src, pos: 0 };
    let expr = parser.union()?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(format!(
            "unexpected trailing input `{}`",
            &parser.src[parser.pos..]
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn union(&mut self) -> Result<TypeExpr, String> {
        let mut members = vec![self.term()?];
        loop {
            self.skip_ws();
            if self.eat('|') {
                members.push(self.term()?);
            } else {
                break;
            }
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeExpr::Union(members)
        })
    }

    fn term(&mut self) -> Result<TypeExpr, String> {
        self.skip_ws();
        match self.ident()? {
            "str" => Ok(TypeExpr::Str),
            "int" => Ok(TypeExpr::Int),
            "float" => Ok(TypeExpr::Float),
            "bool" => Ok(TypeExpr::Bool),
            "null" => Ok(TypeExpr::Null),
            "list" => {
                self.skip_ws();
                if !self.eat('[') {
                    return Err("expected `[` after `list`".into());
                }
                let element = self.union()?;
                self.skip_ws();
                if !self.eat(']') {
                    return Err("expected `]` closing the list element type".into());
                }
                Ok(TypeExpr::List(Box::new(element)))
            }
            name => Ok(TypeExpr::Named(name.to_string())),
        }
    }

    fn ident(&mut self) -> Result<&'a str, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => format!("expected a type name, found `{c}`"),
                None => "expected a type name, found end of input".into(),
            });
        }
        Ok(&self.src[start..self.pos])
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }
}
