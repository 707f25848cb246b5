//! Grammar dialect strategy.
//!
//! A dialect owns two things: the naming scheme for registry keys (primitive
//! names, the list-name convention, declared-name casing) and the pure
//! rendering of each type category into dialect syntax. Rendering never
//! touches the registry; that mutation belongs to the compiler driving it.

pub mod ebnf;
pub mod gbnf;

use once_cell::sync::Lazy;

use crate::descriptor::Primitive;
use crate::error::CompileError;

pub use ebnf::EbnfDialect;
pub use gbnf::GbnfDialect;

pub trait GrammarDialect: Sync + std::fmt::Debug {
    /// Identifier used for by-name lookup (`--format`).
    fn id(&self) -> &'static str;

    // Naming hooks: the registry is keyed by the names these return.

    fn primitive_rule_name(&self, prim: Primitive) -> &'static str;
    fn list_rule_name(&self, element_rule: &str) -> String;
    fn type_rule_name(&self, declared: &str) -> String;

    // Pure rendering of full rule productions.

    fn render_primitive(&self, prim: Primitive) -> String;
    fn render_list(&self, element_rule: &str) -> String;
    fn render_enum(&self, rule_name: &str, values: &[String]) -> String;
    fn render_object(&self, rule_name: &str, field_rules: &[String]) -> String;
    fn render_field(&self, field_name: &str, element_rule: &str, required: bool) -> String;

    /// Assemble the final document: a designated start production for
    /// `root_rule`, plus every accumulated body in registry insertion order.
    fn render_root(&self, root_rule: &str, bodies: &[&str]) -> String;
}

static DIALECTS: Lazy<Vec<&'static dyn GrammarDialect>> =
    Lazy::new(|| vec![&GbnfDialect, &EbnfDialect]);

/// Look up a registered dialect by identifier.
pub fn dialect(id: &str) -> Result<&'static dyn GrammarDialect, CompileError> {
    DIALECTS
        .iter()
        .copied()
        .find(|dialect| dialect.id() == id)
        .ok_or_else(|| CompileError::UnsupportedFormat {
            requested: id.to_string(),
            known: DIALECTS
                .iter()
                .map(|dialect| dialect.id())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
