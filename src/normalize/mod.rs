// src/normalize/mod.rs

pub mod categorical;
pub mod numeric;
pub mod resource;

pub use categorical::match_categorical;
pub use numeric::{parse_budget, parse_count, DELIVERY_UNITS, DURATION_UNITS, TEAM_UNITS};
pub use resource::parse_resource_level;

use tracing::debug;

use crate::matching::FuzzyMatcher;
use crate::record::{
    CategoricalField, Field, InvalidFieldSet, ProjectRecord, RawFields, RawValue, StartDate,
};
use crate::vocab::Vocabulary;

/// Turns raw user input into a [`ProjectRecord`]. Every rule works on one
/// field; failures drop the field or mark it invalid, nothing is raised.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'v> {
    vocabulary: &'v Vocabulary,
    matcher: FuzzyMatcher,
}

impl<'v> Normalizer<'v> {
    pub fn new(vocabulary: &'v Vocabulary, matcher: FuzzyMatcher) -> Self {
        Self {
            vocabulary,
            matcher,
        }
    }

    pub fn normalize(&self, raw: &RawFields) -> (ProjectRecord, InvalidFieldSet) {
        let mut record = ProjectRecord::default();

        let count = |field: Field, units: &[&str]| {
            raw.get(field)
                .and_then(|v| dropped(field, v, parse_count(v, units)))
        };
        record.duration_months = count(Field::DurationMonths, DURATION_UNITS);
        record.deliveries = count(Field::Deliveries, DELIVERY_UNITS);
        record.team_size = count(Field::TeamSize, TEAM_UNITS);

        record.budget = raw
            .get(Field::Budget)
            .and_then(|v| dropped(Field::Budget, v, parse_budget(v)));
        record.resource_level = raw
            .get(Field::ResourceLevel)
            .and_then(|v| dropped(Field::ResourceLevel, v, parse_resource_level(v)));
        record.start_date = raw
            .get(Field::StartDate)
            .and_then(|v| StartDate::parse(&v.to_string()));

        for field in CategoricalField::ALL {
            *record.categorical_mut(field) = match_categorical(
                raw.get(field.field()),
                self.vocabulary.get(field),
                &self.matcher,
            );
        }

        let invalid = record.invalid_fields();
        (record, invalid)
    }
}

fn dropped<T>(field: Field, raw: &RawValue, parsed: Option<T>) -> Option<T> {
    if parsed.is_none() {
        debug!(field = %field, raw = %raw, "could not read value; dropping field");
    }
    parsed
}

/// One-shot form of [`Normalizer::normalize`].
pub fn normalize(
    raw: &RawFields,
    vocabulary: &Vocabulary,
    matcher: FuzzyMatcher,
) -> (ProjectRecord, InvalidFieldSet) {
    Normalizer::new(vocabulary, matcher).normalize(raw)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::{FieldState, ResourceLevel};

    pub(crate) fn sample_vocabulary() -> Vocabulary {
        Vocabulary::from_entries([
            (
                CategoricalField::ProjectType,
                vec!["Construção", "Infraestrutura", "Pesquisa", "Software"],
            ),
            (
                CategoricalField::Department,
                vec!["Financeiro", "Marketing", "Operações", "RH", "TI"],
            ),
            (CategoricalField::Complexity, vec!["Alta", "Baixa", "Média"]),
            (
                CategoricalField::Methodology,
                vec!["Agile", "Kanban", "Scrum", "Waterfall", "XP"],
            ),
            (CategoricalField::Risk, vec!["Alto", "Baixo", "Médio"]),
        ])
    }

    pub(crate) fn sample_raw() -> RawFields {
        RawFields::new()
            .with(Field::DurationMonths, "6 meses")
            .with(Field::Budget, "500 mil")
            .with(Field::Deliveries, "3 entregas")
            .with(Field::TeamSize, "5 pessoas")
            .with(Field::ResourceLevel, "Alta")
            .with(Field::StartDate, "15/03/2024")
            .with(Field::ProjectType, "Software")
            .with(Field::Department, "TI")
            .with(Field::Complexity, "Alta")
            .with(Field::Methodology, "Agile")
            .with(Field::Risk, "Baixo")
    }

    #[test]
    fn test_full_example() {
        let vocab = sample_vocabulary();
        let (record, invalid) = normalize(&sample_raw(), &vocab, FuzzyMatcher::default());

        assert!(invalid.is_empty());
        assert_eq!(record.duration_months, Some(6));
        assert_eq!(record.budget, Some(500_000.0));
        assert_eq!(record.deliveries, Some(3));
        assert_eq!(record.team_size, Some(5));
        assert_eq!(record.resource_level, Some(ResourceLevel::High));
        assert_eq!(record.project_type, FieldState::Valid("Software".into()));
        assert_eq!(record.department, FieldState::Valid("TI".into()));
        assert_eq!(record.complexity, FieldState::Valid("Alta".into()));
        assert_eq!(record.methodology, FieldState::Valid("Agile".into()));
        assert_eq!(record.risk, FieldState::Valid("Baixo".into()));
        assert_eq!(
            record.start_date.as_ref().map(|d| d.text.as_str()),
            Some("15/03/2024")
        );
    }

    #[test]
    fn test_absent_stays_absent() {
        let vocab = sample_vocabulary();
        let (record, invalid) = normalize(&RawFields::new(), &vocab, FuzzyMatcher::default());
        assert_eq!(record, ProjectRecord::default());
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_invalid_and_dropped_are_separate() {
        let vocab = sample_vocabulary();
        let raw = sample_raw()
            .with(Field::Deliveries, "some deliveries")
            .with(Field::Methodology, "Prince2");
        let (record, invalid) = normalize(&raw, &vocab, FuzzyMatcher::default());

        assert_eq!(record.deliveries, None);
        assert_eq!(record.methodology, FieldState::Invalid("Prince2".into()));
        assert_eq!(invalid.len(), 1);
        assert_eq!(
            invalid.get(&CategoricalField::Methodology).map(String::as_str),
            Some("Prince2")
        );
    }

    #[test]
    fn test_typos_and_accents() {
        let vocab = sample_vocabulary();
        let raw = RawFields::new()
            .with(Field::ProjectType, "sofware")
            .with(Field::Department, "operacoes")
            .with(Field::Complexity, "MEDIA")
            .with(Field::Methodology, "Scrumm")
            .with(Field::Risk, "  alto ");
        let (record, invalid) = normalize(&raw, &vocab, FuzzyMatcher::default());

        assert!(invalid.is_empty());
        assert_eq!(record.project_type, FieldState::Valid("Software".into()));
        assert_eq!(record.department, FieldState::Valid("Operações".into()));
        assert_eq!(record.complexity, FieldState::Valid("Média".into()));
        assert_eq!(record.methodology, FieldState::Valid("Scrum".into()));
        assert_eq!(record.risk, FieldState::Valid("Alto".into()));
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        let vocab = sample_vocabulary();
        let odd: Vec<RawValue> = vec![
            RawValue::Text(String::new()),
            RawValue::Text("   ".into()),
            RawValue::Text("💥💥".into()),
            RawValue::Text("R$".into()),
            RawValue::Text("-5".into()),
            RawValue::Text("1e400".into()),
            RawValue::Text("k".into()),
            RawValue::Number(f64::NAN),
            RawValue::Number(f64::NEG_INFINITY),
            RawValue::Number(-0.0),
            RawValue::Number(1e308),
        ];
        for value in odd {
            let mut raw = RawFields::new();
            for field in Field::ALL {
                raw.set(field, value.clone());
            }
            let (record, invalid) = normalize(&raw, &vocab, FuzzyMatcher::default());
            assert!(invalid.keys().all(|c| !record.categorical(*c).is_valid()));
            if let Some(level) = record.resource_level {
                assert!(level.index() <= 2);
            }
            for count in [record.duration_months, record.deliveries, record.team_size] {
                assert!(count.map_or(true, |n| n >= 0));
            }
            assert!(record.budget.map_or(true, |b| b >= 0.0));
        }
    }

    #[test]
    fn test_renormalizing_is_stable() {
        let vocab = sample_vocabulary();
        let raw = sample_raw()
            .with(Field::Complexity, "media")
            .with(Field::Department, "operacoes")
            .with(Field::ResourceLevel, "médios");
        let (first, _) = normalize(&raw, &vocab, FuzzyMatcher::default());
        let (second, invalid) = normalize(&first.to_raw(), &vocab, FuzzyMatcher::default());

        assert!(invalid.is_empty());
        assert_eq!(second.resource_level, first.resource_level);
        for c in CategoricalField::ALL {
            assert_eq!(second.categorical(c), first.categorical(c));
        }
        assert_eq!(second, first);
    }
}
