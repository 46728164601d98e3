// src/record/raw.rs

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};
use tracing::debug;

use super::Field;

/// A field value as the user supplied it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    /// JSON scalars map onto raw values; anything else counts as not supplied.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RawValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(RawValue::Number),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => f.write_str(s),
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            RawValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

/// Raw input map: at most one value per recognised field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFields {
    values: BTreeMap<Field, RawValue>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<RawValue>) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn with(mut self, field: Field, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decode a JSON object. Keys may be canonical names, dataset column
    /// names or short aliases; unknown keys and `null` are skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| anyhow!("raw project fields must be a JSON object"))?;

        let mut raw = RawFields::default();
        for (key, v) in obj {
            let Some(field) = Field::from_key(key) else {
                debug!(key = %key, "ignoring unknown input key");
                continue;
            };
            match RawValue::from_json(v) {
                Some(rv) => {
                    raw.set(field, rv);
                }
                None => debug!(field = %field, "non-scalar input treated as absent"),
            }
        }
        Ok(raw)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}
