//! Human-readable shape reports.
//!
//! A documentation view of the model graph, not a grammar: each record lists
//! its fields with their declared type syntax, each enum lists its members.
//! Shapes appear once, breadth-first from the root.

use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::error::CompileError;
use crate::model::{FieldIntrospector, TypeExpr};

/// Render the record and enum shapes reachable from `root`.
pub fn semantic_report(
    models: &dyn FieldIntrospector,
    root: &str,
) -> Result<String, CompileError> {
    let mut lines: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(root.to_string());

    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        if let Some(enumeration) = models.enumeration(&name) {
            lines.push(format!("{} (ENUM):", enumeration.name));
            for value in &enumeration.values {
                lines.push(format!("    {value}"));
            }
        } else if let Some(record) = models.record(&name) {
            lines.push(format!("{}:", record.name));
            for field in &record.fields {
                let description = field
                    .description
                    .as_deref()
                    .map(|text| format!(" ({text})"))
                    .unwrap_or_default();
                lines.push(format!("    {}: {}{}", field.name, field.ty, description));
                collect_references(&field.ty, &mut queue);
            }
        } else {
            return Err(CompileError::UnsupportedType(format!("unknown type `{name}`")));
        }
    }

    Ok(lines.join("\n"))
}

fn collect_references(ty: &TypeExpr, queue: &mut VecDeque<String>) {
    match ty {
        TypeExpr::List(element) => collect_references(element, queue),
        TypeExpr::Union(members) => {
            for member in members {
                collect_references(member, queue);
            }
        }
        TypeExpr::Named(name) => queue.push_back(name.clone()),
        _ => {}
    }
}
