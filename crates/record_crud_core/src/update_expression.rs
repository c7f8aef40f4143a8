//! Partial-update expression synthesis.
//!
//! A payload becomes a `SET` expression with placeholder tokens, so attribute
//! names and values never appear inline in the expression text. Token indices
//! follow payload order and are contiguous from zero within one build.

use serde_json::Value;

use crate::contract::{Payload, Record};

/// One `SET` clause: `name_token = value_token`, bound to `attribute_name` and `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    pub name_token: String,
    pub attribute_name: String,
    pub value_token: String,
    pub value: Value,
}

/// Non-empty, ordered set of assignments. The empty case is represented by
/// `build_update_spec` returning `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSpec {
    assignments: Vec<UpdateAssignment>,
}

impl UpdateSpec {
    pub fn assignments(&self) -> &[UpdateAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders `SET #k0 = :v0, #k1 = :v1, ...`.
    pub fn expression(&self) -> String {
        let clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|assignment| format!("{} = {}", assignment.name_token, assignment.value_token))
            .collect();
        format!("SET {}", clauses.join(", "))
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assignments.iter().map(|assignment| {
            (
                assignment.name_token.as_str(),
                assignment.attribute_name.as_str(),
            )
        })
    }

    pub fn attribute_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.assignments
            .iter()
            .map(|assignment| (assignment.value_token.as_str(), &assignment.value))
    }

    /// Sets every named attribute on `record`, leaving all others untouched.
    pub fn apply_to(&self, record: &mut Record) {
        for assignment in &self.assignments {
            record.insert(assignment.attribute_name.clone(), assignment.value.clone());
        }
    }
}

/// Builds the update for `payload`, skipping key fields and absent-marked fields.
///
/// Returns `None` when nothing remains to set.
pub fn build_update_spec(payload: &Payload, key_fields: &[&str]) -> Option<UpdateSpec> {
    let assignments: Vec<UpdateAssignment> = payload
        .iter()
        .filter(|(name, _)| !key_fields.contains(name))
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .enumerate()
        .map(|(index, (name, value))| UpdateAssignment {
            name_token: format!("#k{index}"),
            attribute_name: name.to_string(),
            value_token: format!(":v{index}"),
            value: value.clone(),
        })
        .collect();

    if assignments.is_empty() {
        None
    } else {
        Some(UpdateSpec { assignments })
    }
}
