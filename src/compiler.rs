//! Recursive type-to-grammar compilation.
//!
//! [`GrammarCompiler`] is the depth-first driver: compile a descriptor,
//! return the rule name that references it, registering any missing rules on
//! the way. [`RecordCompiler`] is the public entry point bound to a record
//! name: it compiles the record graph and renders the registry as a single
//! grammar document, or hands back the raw name → body mapping.
//!
//! Composites follow the reserve → recurse → fulfill sequence: the record's
//! rule name is reserved before its fields compile, so a recursive reference
//! (direct or through another record) resolves to the reserved name instead
//! of re-entering. That single discipline is what bounds recursion on cyclic
//! record graphs.

use indexmap::IndexMap;

use crate::descriptor::{Category, TypeDescriptor};
use crate::dialect::GrammarDialect;
use crate::error::CompileError;
use crate::model::FieldIntrospector;
use crate::registry::RuleRegistry;

pub struct GrammarCompiler<'a> {
    models: &'a dyn FieldIntrospector,
    dialect: &'a dyn GrammarDialect,
}

impl<'a> GrammarCompiler<'a> {
    pub fn new(models: &'a dyn FieldIntrospector, dialect: &'a dyn GrammarDialect) -> Self {
        GrammarCompiler { models, dialect }
    }

    /// Compile `descriptor`, returning the rule name to reference it by.
    /// Registration is idempotent: a name already present (ready or
    /// reserved) is returned without recompiling.
    pub fn compile(
        &self,
        descriptor: &TypeDescriptor,
        registry: &mut RuleRegistry,
    ) -> Result<String, CompileError> {
        match &descriptor.category {
            Category::Primitive(prim) => {
                let name = self.dialect.primitive_rule_name(*prim);
                if !registry.contains(name) {
                    registry.register(name, self.dialect.render_primitive(*prim));
                }
                Ok(name.to_string())
            }
            Category::List(element) => {
                let element_rule = self.compile(element, registry)?;
                let name = self.dialect.list_rule_name(&element_rule);
                if !registry.contains(&name) {
                    registry.register(&name, self.dialect.render_list(&element_rule));
                }
                Ok(name)
            }
            Category::Enum { name, values } => {
                let rule = self.dialect.type_rule_name(name);
                if !registry.contains(&rule) {
                    registry.register(&rule, self.dialect.render_enum(&rule, values));
                }
                Ok(rule)
            }
            Category::Composite { name } => self.compile_composite(name, registry),
        }
    }

    fn compile_composite(
        &self,
        record_name: &str,
        registry: &mut RuleRegistry,
    ) -> Result<String, CompileError> {
        let rule = self.dialect.type_rule_name(record_name);
        if registry.contains(&rule) {
            // Cycle-breaking step: a reserved or finished rule is final.
            return Ok(rule);
        }
        let record = self.models.record(record_name).ok_or_else(|| {
            CompileError::UnsupportedType(format!("unknown record `{record_name}`"))
        })?;

        registry.reserve(&rule);
        let mut field_rules = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let descriptor = TypeDescriptor::of_field(field, self.models)?;
            let element_rule = self.compile(&descriptor, registry)?;
            field_rules.push(self.dialect.render_field(
                &field.name,
                &element_rule,
                descriptor.required,
            ));
        }
        registry.fulfill(&rule, self.dialect.render_object(&rule, &field_rules));
        Ok(rule)
    }
}

/// Entry point bound to a record name.
pub struct RecordCompiler<'a> {
    models: &'a dyn FieldIntrospector,
    dialect: &'a dyn GrammarDialect,
}

impl<'a> RecordCompiler<'a> {
    pub fn new(models: &'a dyn FieldIntrospector, dialect: &'a dyn GrammarDialect) -> Self {
        RecordCompiler { models, dialect }
    }

    /// Compile `record_name` and render the whole grammar document.
    pub fn compile_to_text(&self, record_name: &str) -> Result<String, CompileError> {
        let (root_rule, registry) = self.compile_into(record_name, RuleRegistry::new())?;
        let bodies: Vec<&str> = registry.bodies().collect();
        Ok(self.dialect.render_root(&root_rule, &bodies))
    }

    /// Compile into a caller-supplied registry, for merging several record
    /// compilations into one document. The registry is taken by value and
    /// handed back only on success, so a failed pass leaves nothing to
    /// salvage.
    pub fn compile_into(
        &self,
        record_name: &str,
        mut registry: RuleRegistry,
    ) -> Result<(String, RuleRegistry), CompileError> {
        if self.models.record(record_name).is_none() {
            return Err(if self.models.enumeration(record_name).is_some() {
                CompileError::NotAComposite(record_name.to_string())
            } else {
                CompileError::UnsupportedType(format!("unknown record `{record_name}`"))
            });
        }
        let compiler = GrammarCompiler::new(self.models, self.dialect);
        let descriptor = TypeDescriptor {
            category: Category::Composite {
                name: record_name.to_string(),
            },
            required: true,
        };
        let root_rule = compiler.compile(&descriptor, &mut registry)?;
        Ok((root_rule, registry))
    }

    /// The raw name → body mapping, for programmatic composition instead of
    /// a rendered document.
    pub fn compile_to_rules(
        &self,
        record_name: &str,
    ) -> Result<IndexMap<String, String>, CompileError> {
        let (_, registry) = self.compile_into(record_name, RuleRegistry::new())?;
        Ok(registry.into_rules())
    }
}

/// Convenience: compile `record_name` to the dialect registered under
/// `format`.
pub fn compile_record(
    models: &dyn FieldIntrospector,
    record_name: &str,
    format: &str,
) -> Result<String, CompileError> {
    let dialect = crate::dialect::dialect(format)?;
    RecordCompiler::new(models, dialect).compile_to_text(record_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{EbnfDialect, GbnfDialect};
    use crate::model::{EnumDecl, FieldDecl, ModelDecl, ModelSet, RecordDecl, TypeExpr};
    use serde_json::Value;

    fn person_models() -> ModelSet {
        let mut set = ModelSet::new();
        set.declare(ModelDecl::Enum(EnumDecl {
            name: "Status".into(),
            values: vec!["ACTIVE".into(), "INACTIVE".into()],
        }));
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Person".into(),
            fields: vec![
                FieldDecl::new("name", TypeExpr::Str),
                FieldDecl::new("age", TypeExpr::Int),
                FieldDecl::new("tags", TypeExpr::list(TypeExpr::Str)),
                FieldDecl::new("status", TypeExpr::named("Status")),
                FieldDecl::new("note", TypeExpr::Str.nullable()).with_default(Value::Null),
            ],
        }));
        set
    }

    #[test]
    fn person_compiles_to_the_expected_gbnf_document() {
        let set = person_models();
        let grammar = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_text("Person")
            .unwrap();

        let lines: Vec<&str> = grammar.lines().collect();
        assert_eq!(lines[0], "root ::= person");
        // First-encounter order: the root record is reserved before its
        // field types register.
        assert_eq!(
            lines[1],
            "person ::= \"{\" ((\"\\\"name\\\"\" \":\" str)\",\"(\"\\\"age\\\"\" \":\" int)\
             \",\"(\"\\\"tags\\\"\" \":\" str-arr)\",\"(\"\\\"status\\\"\" \":\" status)\
             \",\"(\"\\\"note\\\"\" \":\" str)?) \"}\""
        );
        assert_eq!(
            lines[2],
            "str ::= \"\\\"\" ([0-9a-zA-Z.,;:!?()\\-@_'] | \" \")* \"\\\"\""
        );
        assert_eq!(lines[3], "int ::= (\"-\"? ([0-9] | [1-9] [0-9]*))");
        assert_eq!(lines[4], "str-arr ::= \"[\" (str (\",\" str)*) \"]\"");
        assert_eq!(
            lines[5],
            "status ::= (\"\\\"ACTIVE\\\"\"|\"\\\"INACTIVE\\\"\")"
        );
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn person_compiles_to_the_expected_ebnf_document() {
        let set = person_models();
        let grammar = RecordCompiler::new(&set, &EbnfDialect)
            .compile_to_text("Person")
            .unwrap();

        assert!(grammar.starts_with("?start: PERSON\n\n"));
        assert!(grammar.contains(
            "PERSON: \"{\" \"name\" \":\" STRING \",\" \"age\" \":\" INT \
             \",\" \"tags\" \":\" STRING_LIST \",\" \"status\" \":\" STATUS \
             \",\" (\"note\" \":\" STRING)? \"}\""
        ));
        assert!(grammar.contains("STRING_LIST: \"[\" (STRING (\",\" STRING)*)? \"]\""));
        assert!(grammar.contains("STATUS: \"ACTIVE\" | \"INACTIVE\""));

        // Terminal trailer: all four, exactly once, at the end.
        assert_eq!(grammar.matches("STRING: ").count(), 1);
        assert_eq!(grammar.matches("INT: ").count(), 1);
        assert!(grammar.ends_with(
            "STRING: \"\\\"\" (/[^\"\\\\]/ | \"\\\\\" .)* \"\\\"\"\n\
             INT: [+-]?[0-9]+\n\
             FLOAT: [+-]?[0-9]+\\.[0-9]+([eE][+-]?[0-9]+)?\n\
             BOOL: \"true\" | \"false\""
        ));
    }

    #[test]
    fn compilation_is_deterministic() {
        let set = person_models();
        let compiler = RecordCompiler::new(&set, &GbnfDialect);
        let first = compiler.compile_to_text("Person").unwrap();
        let second = compiler.compile_to_text("Person").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn registration_is_idempotent_across_passes() {
        let set = person_models();
        let compiler = RecordCompiler::new(&set, &GbnfDialect);
        let (_, registry) = compiler
            .compile_into("Person", RuleRegistry::new())
            .unwrap();
        let before: Vec<String> = registry.names().map(str::to_string).collect();

        let (_, registry) = compiler.compile_into("Person", registry).unwrap();
        let after: Vec<String> = registry.names().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn rule_order_matches_first_encounter() {
        let set = person_models();
        let rules = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_rules("Person")
            .unwrap();
        let names: Vec<&String> = rules.keys().collect();
        assert_eq!(names, ["person", "str", "int", "str-arr", "status"]);
    }

    #[test]
    fn self_referential_record_terminates_with_one_rule() {
        let mut set = ModelSet::new();
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Node".into(),
            fields: vec![
                FieldDecl::new("value", TypeExpr::Int),
                FieldDecl::new("children", TypeExpr::list(TypeExpr::named("Node"))),
            ],
        }));

        let grammar = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_text("Node")
            .unwrap();
        assert_eq!(grammar.matches("node ::=").count(), 1);
        assert!(grammar.contains("node-arr ::= \"[\" (node (\",\" node)*) \"]\""));
    }

    #[test]
    fn mutually_referential_records_terminate() {
        let mut set = ModelSet::new();
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Author".into(),
            fields: vec![
                FieldDecl::new("name", TypeExpr::Str),
                FieldDecl::new("books", TypeExpr::list(TypeExpr::named("Book"))),
            ],
        }));
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Book".into(),
            fields: vec![
                FieldDecl::new("title", TypeExpr::Str),
                FieldDecl::new("author", TypeExpr::named("Author")),
            ],
        }));

        let rules = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_rules("Author")
            .unwrap();
        let names: Vec<&String> = rules.keys().collect();
        assert_eq!(names, ["author", "str", "book", "book-arr"]);
    }

    #[test]
    fn nullable_field_without_default_fails_and_discards_the_registry() {
        let mut set = ModelSet::new();
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Person".into(),
            fields: vec![
                FieldDecl::new("name", TypeExpr::Str),
                FieldDecl::new("note", TypeExpr::Str.nullable()),
            ],
        }));

        let err = RecordCompiler::new(&set, &GbnfDialect)
            .compile_into("Person", RuleRegistry::new())
            .unwrap_err();
        match err {
            CompileError::MissingDefault(field) => assert_eq!(field, "note"),
            other => panic!("expected MissingDefault, got {other:?}"),
        }
    }

    #[test]
    fn enum_root_is_not_a_composite() {
        let set = person_models();
        let err = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_text("Status")
            .unwrap_err();
        assert!(matches!(err, CompileError::NotAComposite(name) if name == "Status"));
    }

    #[test]
    fn unknown_root_is_unsupported() {
        let set = person_models();
        let err = RecordCompiler::new(&set, &GbnfDialect)
            .compile_to_text("Ghost")
            .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedType(_)));
    }

    #[test]
    fn shared_registry_merges_compilations_without_duplicates() {
        let mut set = person_models();
        set.declare(ModelDecl::Record(RecordDecl {
            name: "Team".into(),
            fields: vec![
                FieldDecl::new("label", TypeExpr::Str),
                FieldDecl::new("members", TypeExpr::list(TypeExpr::named("Person"))),
            ],
        }));

        let compiler = RecordCompiler::new(&set, &GbnfDialect);
        let (_, registry) = compiler
            .compile_into("Person", RuleRegistry::new())
            .unwrap();
        let (_, registry) = compiler.compile_into("Team", registry).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            ["person", "str", "int", "str-arr", "status", "team", "person-arr"]
        );
    }

    #[test]
    fn compile_record_resolves_the_dialect_by_name() {
        let set = person_models();
        let gbnf = compile_record(&set, "Person", "gbnf").unwrap();
        assert!(gbnf.starts_with("root ::= person\n"));

        let err = compile_record(&set, "Person", "abnf").unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedFormat { .. }));
    }
}
