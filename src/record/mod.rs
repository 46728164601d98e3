// src/record/mod.rs

pub mod raw;

pub use raw::{RawFields, RawValue};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Every field a project record carries, in the order users are asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DurationMonths,
    Budget,
    Deliveries,
    TeamSize,
    ResourceLevel,
    StartDate,
    ProjectType,
    Department,
    Complexity,
    Methodology,
    Risk,
}

impl Field {
    /// Canonical prompt order. Anything user-facing iterates this.
    pub const ALL: [Field; 11] = [
        Field::DurationMonths,
        Field::Budget,
        Field::Deliveries,
        Field::TeamSize,
        Field::ResourceLevel,
        Field::StartDate,
        Field::ProjectType,
        Field::Department,
        Field::Complexity,
        Field::Methodology,
        Field::Risk,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::DurationMonths => "duration_months",
            Field::Budget => "budget",
            Field::Deliveries => "deliveries",
            Field::TeamSize => "team_size",
            Field::ResourceLevel => "resource_level",
            Field::StartDate => "start_date",
            Field::ProjectType => "project_type",
            Field::Department => "department",
            Field::Complexity => "complexity",
            Field::Methodology => "methodology",
            Field::Risk => "risk",
        }
    }

    /// Human label used when asking for the field.
    pub fn label(self) -> &'static str {
        match self {
            Field::DurationMonths => "Project duration (in months)",
            Field::Budget => "Project budget",
            Field::Deliveries => "Number of planned deliveries",
            Field::TeamSize => "Team size (number of people)",
            Field::ResourceLevel => "Available resources",
            Field::StartDate => "Project start date",
            Field::ProjectType => "Type of project",
            Field::Department => "Responsible department",
            Field::Complexity => "Project complexity",
            Field::Methodology => "Methodology",
            Field::Risk => "Risk level",
        }
    }

    /// Resolve an input key: canonical name, dataset column name or short alias.
    pub fn from_key(key: &str) -> Option<Field> {
        let field = match key.trim().to_lowercase().as_str() {
            "duration_months" | "duration" | "duracao_meses" | "duracao" => Field::DurationMonths,
            "budget" | "orcamento" => Field::Budget,
            "deliveries" | "entregas" => Field::Deliveries,
            "team_size" | "team" | "tamanho_equipe" | "equipe" => Field::TeamSize,
            "resource_level" | "resources" | "recursos_disponiveis" | "recursos" => {
                Field::ResourceLevel
            }
            "start_date" | "date" | "data_inicio" => Field::StartDate,
            "project_type" | "type" | "tipo_projeto" => Field::ProjectType,
            "department" | "dept" | "departamento" => Field::Department,
            "complexity" | "complexidade" => Field::Complexity,
            "methodology" | "metodologia" => Field::Methodology,
            "risk" | "risco" => Field::Risk,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_categorical(self) -> Option<CategoricalField> {
        CategoricalField::ALL
            .into_iter()
            .find(|c| c.field() == self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The five fields validated against the reference vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    ProjectType,
    Department,
    Complexity,
    Methodology,
    Risk,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::ProjectType,
        CategoricalField::Department,
        CategoricalField::Complexity,
        CategoricalField::Methodology,
        CategoricalField::Risk,
    ];

    pub fn field(self) -> Field {
        match self {
            CategoricalField::ProjectType => Field::ProjectType,
            CategoricalField::Department => Field::Department,
            CategoricalField::Complexity => Field::Complexity,
            CategoricalField::Methodology => Field::Methodology,
            CategoricalField::Risk => Field::Risk,
        }
    }

    pub fn key(self) -> &'static str {
        self.field().key()
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Presence of a vocabulary-checked value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState<T> {
    #[default]
    Absent,
    /// Supplied but rejected; holds the text the user gave.
    Invalid(String),
    Valid(T),
}

impl<T> FieldState<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            FieldState::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FieldState::Valid(_))
    }

    pub fn invalid_raw(&self) -> Option<&str> {
        match self {
            FieldState::Invalid(raw) => Some(raw),
            _ => None,
        }
    }
}

/// Available resources scale: Low=0, Medium=1, High=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceLevel {
    Low,
    Medium,
    High,
}

impl ResourceLevel {
    pub fn from_index(n: i64) -> Option<Self> {
        match n {
            0 => Some(ResourceLevel::Low),
            1 => Some(ResourceLevel::Medium),
            2 => Some(ResourceLevel::High),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Portuguese word used in reports.
    pub fn word(self) -> &'static str {
        ["Baixo", "Médio", "Alto"][self.index() as usize]
    }
}

impl Serialize for ResourceLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// Start date as entered, plus its `dd/mm/yyyy` reading when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDate {
    pub text: String,
    pub date: Option<NaiveDate>,
}

impl StartDate {
    pub const FORMAT: &'static str = "%d/%m/%Y";

    /// `None` for blank input. Unparseable text is kept with `date: None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            date: NaiveDate::parse_from_str(text, Self::FORMAT).ok(),
        })
    }
}

/// Categorical fields that failed matching, keyed in canonical order.
pub type InvalidFieldSet = BTreeMap<CategoricalField, String>;

/// The normalized project. Numeric fields can only be present or absent;
/// categorical fields additionally remember a rejected value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectRecord {
    pub duration_months: Option<i64>,
    pub budget: Option<f64>,
    pub deliveries: Option<i64>,
    pub team_size: Option<i64>,
    pub resource_level: Option<ResourceLevel>,
    pub start_date: Option<StartDate>,
    pub project_type: FieldState<String>,
    pub department: FieldState<String>,
    pub complexity: FieldState<String>,
    pub methodology: FieldState<String>,
    pub risk: FieldState<String>,
}

impl ProjectRecord {
    pub fn categorical(&self, field: CategoricalField) -> &FieldState<String> {
        match field {
            CategoricalField::ProjectType => &self.project_type,
            CategoricalField::Department => &self.department,
            CategoricalField::Complexity => &self.complexity,
            CategoricalField::Methodology => &self.methodology,
            CategoricalField::Risk => &self.risk,
        }
    }

    pub fn categorical_mut(&mut self, field: CategoricalField) -> &mut FieldState<String> {
        match field {
            CategoricalField::ProjectType => &mut self.project_type,
            CategoricalField::Department => &mut self.department,
            CategoricalField::Complexity => &mut self.complexity,
            CategoricalField::Methodology => &mut self.methodology,
            CategoricalField::Risk => &mut self.risk,
        }
    }

    /// True when the field holds a usable, non-empty value.
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::DurationMonths => self.duration_months.is_some(),
            Field::Budget => self.budget.is_some(),
            Field::Deliveries => self.deliveries.is_some(),
            Field::TeamSize => self.team_size.is_some(),
            Field::ResourceLevel => self.resource_level.is_some(),
            Field::StartDate => self
                .start_date
                .as_ref()
                .map_or(false, |d| !d.text.is_empty()),
            other => other
                .as_categorical()
                .and_then(|c| self.categorical(c).valid())
                .map_or(false, |v| !v.trim().is_empty()),
        }
    }

    /// Rejected categorical values, rebuilt from the per-field states.
    pub fn invalid_fields(&self) -> InvalidFieldSet {
        CategoricalField::ALL
            .into_iter()
            .filter_map(|c| {
                self.categorical(c)
                    .invalid_raw()
                    .map(|raw| (c, raw.to_string()))
            })
            .collect()
    }

    /// Feed the record back through normalization as raw input.
    pub fn to_raw(&self) -> RawFields {
        let mut raw = RawFields::default();
        if let Some(v) = self.duration_months {
            raw.set(Field::DurationMonths, RawValue::Number(v as f64));
        }
        if let Some(v) = self.budget {
            raw.set(Field::Budget, RawValue::Number(v));
        }
        if let Some(v) = self.deliveries {
            raw.set(Field::Deliveries, RawValue::Number(v as f64));
        }
        if let Some(v) = self.team_size {
            raw.set(Field::TeamSize, RawValue::Number(v as f64));
        }
        if let Some(level) = self.resource_level {
            raw.set(Field::ResourceLevel, RawValue::Number(level.index() as f64));
        }
        if let Some(date) = &self.start_date {
            raw.set(Field::StartDate, RawValue::Text(date.text.clone()));
        }
        for c in CategoricalField::ALL {
            if let Some(v) = self.categorical(c).valid() {
                raw.set(c.field(), RawValue::Text(v.clone()));
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_prompt() {
        let keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec![
                "duration_months",
                "budget",
                "deliveries",
                "team_size",
                "resource_level",
                "start_date",
                "project_type",
                "department",
                "complexity",
                "methodology",
                "risk"
            ]
        );
        let mut sorted = Field::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Field::ALL.to_vec());
    }

    #[test]
    fn test_from_key_aliases() {
        assert_eq!(Field::from_key("orcamento"), Some(Field::Budget));
        assert_eq!(Field::from_key(" Team "), Some(Field::TeamSize));
        assert_eq!(Field::from_key("data_inicio"), Some(Field::StartDate));
        assert_eq!(Field::from_key("dept"), Some(Field::Department));
        assert_eq!(Field::from_key("colour"), None);
    }

    #[test]
    fn test_start_date_keeps_unparseable_text() {
        let ok = StartDate::parse(" 15/03/2024 ").unwrap();
        assert_eq!(ok.text, "15/03/2024");
        assert_eq!(ok.date, NaiveDate::from_ymd_opt(2024, 3, 15));

        let bad = StartDate::parse("next monday").unwrap();
        assert_eq!(bad.date, None);

        assert!(StartDate::parse("   ").is_none());
    }

    #[test]
    fn test_invalid_fields_only_categorical() {
        let record = ProjectRecord {
            budget: None,
            methodology: FieldState::Invalid("Scrumm".into()),
            risk: FieldState::Valid("Baixo".into()),
            ..Default::default()
        };
        let invalid = record.invalid_fields();
        assert_eq!(invalid.len(), 1);
        assert_eq!(
            invalid.get(&CategoricalField::Methodology).map(String::as_str),
            Some("Scrumm")
        );
        assert!(!record.is_present(Field::Methodology));
        assert!(record.is_present(Field::Risk));
    }

    #[test]
    fn test_resource_level_range() {
        assert_eq!(ResourceLevel::from_index(2), Some(ResourceLevel::High));
        assert_eq!(ResourceLevel::from_index(3), None);
        assert_eq!(ResourceLevel::from_index(-1), None);
        assert_eq!(ResourceLevel::Medium.word(), "Médio");
        assert_eq!(serde_json::to_value(ResourceLevel::High).unwrap(), 2);
    }
}
