//! GBNF dialect, as consumed by grammar-constrained sampling engines.
//!
//! The primitive productions are byte-exact contracts with the consumer; do
//! not reformat them.

use super::GrammarDialect;
use crate::descriptor::Primitive;

#[derive(Debug)]
pub struct GbnfDialect;

impl GrammarDialect for GbnfDialect {
    fn id(&self) -> &'static str {
        "gbnf"
    }

    fn primitive_rule_name(&self, prim: Primitive) -> &'static str {
        prim.name()
    }

    fn list_rule_name(&self, element_rule: &str) -> String {
        format!("{element_rule}-arr")
    }

    fn type_rule_name(&self, declared: &str) -> String {
        declared.to_lowercase()
    }

    fn render_primitive(&self, prim: Primitive) -> String {
        match prim {
            Primitive::Str => r##"str ::= "\"" ([0-9a-zA-Z.,;:!?()\-@_'] | " ")* "\"""##,
            Primitive::Int => r##"int ::= ("-"? ([0-9] | [1-9] [0-9]*))"##,
            Primitive::Float => r##"float ::= ("-"? ([0-9] | [1-9] [0-9]*) ("." [0-9]+)?)"##,
            Primitive::Bool => r##"bool ::= ("true" | "false")"##,
        }
        .to_string()
    }

    fn render_list(&self, element_rule: &str) -> String {
        let e = element_rule;
        format!(r##"{e}-arr ::= "[" ({e} ("," {e})*) "]""##)
    }

    fn render_enum(&self, rule_name: &str, values: &[String]) -> String {
        let members = values
            .iter()
            .map(|value| format!(r##""\"{value}\"""##))
            .collect::<Vec<_>>()
            .join("|");
        format!("{rule_name} ::= ({members})")
    }

    fn render_object(&self, rule_name: &str, field_rules: &[String]) -> String {
        let fields = field_rules.join(r##"",""##);
        format!(r##"{rule_name} ::= "{{" ({fields}) "}}""##)
    }

    fn render_field(&self, field_name: &str, element_rule: &str, required: bool) -> String {
        let optional = if required { "" } else { "?" };
        format!(r##"("\"{field_name}\"" ":" {element_rule}){optional}"##)
    }

    fn render_root(&self, root_rule: &str, bodies: &[&str]) -> String {
        format!("root ::= {root_rule}\n{}", bodies.join("\n"))
    }
}
