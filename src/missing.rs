//! Which required fields still need input, and why.

use std::fmt::Write as _;

use crate::record::{CategoricalField, Field, InvalidFieldSet, ProjectRecord};
use crate::vocab::Vocabulary;

/// Every field is required, in prompt order.
pub const REQUIRED_FIELDS: [Field; 11] = Field::ALL;

/// Required fields that are absent, empty or rejected, in the order of
/// `required`. Each field appears at most once.
pub fn missing_fields_in(
    record: &ProjectRecord,
    invalid: &InvalidFieldSet,
    required: &[Field],
) -> Vec<Field> {
    let mut out: Vec<Field> = Vec::with_capacity(required.len());
    for &field in required {
        let rejected = field
            .as_categorical()
            .map_or(false, |c| invalid.contains_key(&c));
        if (rejected || !record.is_present(field)) && !out.contains(&field) {
            out.push(field);
        }
    }
    out
}

pub fn missing_fields(record: &ProjectRecord, invalid: &InvalidFieldSet) -> Vec<Field> {
    missing_fields_in(record, invalid, &REQUIRED_FIELDS)
}

/// A rejected categorical value and what would have been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub field: CategoricalField,
    pub raw: String,
    pub accepted: Vec<String>,
}

/// Missing and invalid fields kept apart, both in prompt order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MissingReport {
    pub missing: Vec<Field>,
    pub invalid: Vec<InvalidEntry>,
}

impl MissingReport {
    pub fn build(
        record: &ProjectRecord,
        invalid: &InvalidFieldSet,
        vocabulary: &Vocabulary,
    ) -> Self {
        let missing = missing_fields(record, invalid)
            .into_iter()
            .filter(|f| f.as_categorical().map_or(true, |c| !invalid.contains_key(&c)))
            .collect();
        let invalid = invalid
            .iter()
            .map(|(&field, raw)| InvalidEntry {
                field,
                raw: raw.clone(),
                accepted: vocabulary.get(field).to_vec(),
            })
            .collect();
        Self { missing, invalid }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// All fields needing attention, once each, in prompt order.
    pub fn fields(&self) -> Vec<Field> {
        let mut all: Vec<Field> = self
            .missing
            .iter()
            .copied()
            .chain(self.invalid.iter().map(|e| e.field.field()))
            .collect();
        all.sort();
        all.dedup();
        all
    }

    /// Follow-up request naming each field by its label.
    pub fn message(&self) -> String {
        let mut out = String::new();
        if self.is_complete() {
            return out;
        }
        out.push_str("Some required information is missing or invalid.\n");
        if !self.missing.is_empty() {
            out.push_str("\nPlease provide:\n");
            for field in &self.missing {
                let _ = writeln!(out, "- {}", field.label());
            }
        }
        if !self.invalid.is_empty() {
            out.push_str("\nPlease confirm:\n");
            for entry in &self.invalid {
                let _ = write!(
                    out,
                    "- {}: \"{}\" is not recognised",
                    entry.field.field().label(),
                    entry.raw
                );
                if !entry.accepted.is_empty() {
                    let _ = write!(out, " (accepted: {})", entry.accepted.join(", "));
                }
                out.push('\n');
            }
        }
        out
    }
}
