//! EBNF dialect in Lark's notation, for general parser generators.
//!
//! Terminals are uppercase by Lark convention. The four primitive terminals
//! are emitted exactly once, in a fixed trailer at the end of the document;
//! registered primitive bodies exist only so memoization and reference
//! naming work the same way as in every other dialect.

use super::GrammarDialect;
use crate::descriptor::Primitive;

#[derive(Debug)]
pub struct EbnfDialect;

/// Fixed terminal productions, appended verbatim by `render_root`.
const PRIMITIVE_TERMINALS: [&str; 4] = [
    r##"STRING: "\"" (/[^"\\]/ | "\\" .)* "\"""##,
    r##"INT: [+-]?[0-9]+"##,
    r##"FLOAT: [+-]?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?"##,
    r##"BOOL: "true" | "false""##,
];

fn terminal(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Str => PRIMITIVE_TERMINALS[0],
        Primitive::Int => PRIMITIVE_TERMINALS[1],
        Primitive::Float => PRIMITIVE_TERMINALS[2],
        Primitive::Bool => PRIMITIVE_TERMINALS[3],
    }
}

impl GrammarDialect for EbnfDialect {
    fn id(&self) -> &'static str {
        "ebnf"
    }

    fn primitive_rule_name(&self, prim: Primitive) -> &'static str {
        match prim {
            Primitive::Str => "STRING",
            Primitive::Int => "INT",
            Primitive::Float => "FLOAT",
            Primitive::Bool => "BOOL",
        }
    }

    fn list_rule_name(&self, element_rule: &str) -> String {
        format!("{element_rule}_LIST")
    }

    fn type_rule_name(&self, declared: &str) -> String {
        declared.to_uppercase()
    }

    fn render_primitive(&self, prim: Primitive) -> String {
        terminal(prim).to_string()
    }

    fn render_list(&self, element_rule: &str) -> String {
        let e = element_rule;
        format!(r##"{e}_LIST: "[" ({e} ("," {e})*)? "]""##)
    }

    fn render_enum(&self, rule_name: &str, values: &[String]) -> String {
        let members = values
            .iter()
            .map(|value| format!(r#""{value}""#))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{rule_name}: {members}")
    }

    fn render_object(&self, rule_name: &str, field_rules: &[String]) -> String {
        let fields = field_rules.join(r##" "," "##);
        format!(r##"{rule_name}: "{{" {fields} "}}""##)
    }

    fn render_field(&self, field_name: &str, element_rule: &str, required: bool) -> String {
        if required {
            format!(r##""{field_name}" ":" {element_rule}"##)
        } else {
            format!(r##"("{field_name}" ":" {element_rule})?"##)
        }
    }

    fn render_root(&self, root_rule: &str, bodies: &[&str]) -> String {
        let rules = bodies
            .iter()
            .copied()
            .filter(|body| !PRIMITIVE_TERMINALS.contains(body))
            .collect::<Vec<_>>()
            .join("\n\n");
        let terminals = PRIMITIVE_TERMINALS.join("\n");
        if rules.is_empty() {
            format!("?start: {root_rule}\n\n{terminals}")
        } else {
            format!("?start: {root_rule}\n\n{rules}\n\n{terminals}")
        }
    }
}
