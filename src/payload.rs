//! Builds the request body sent to the prediction service.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::record::{ProjectRecord, ResourceLevel};

/// Source of "today" when a record has no usable start date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same day. For tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Calendar features plus every present normalized field. Absent fields are
/// left out of the serialized form entirely. On the wire the keys are the
/// prediction service's column names (`duracao_meses`, `ano_inicio`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    #[serde(rename = "ano_inicio")]
    pub year: i32,
    #[serde(rename = "mes_inicio")]
    pub month: u32,
    #[serde(rename = "dia_semana")]
    pub iso_weekday: u32,
    #[serde(rename = "duracao_meses", skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i64>,
    #[serde(rename = "orcamento", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(rename = "entregas", skip_serializing_if = "Option::is_none")]
    pub deliveries: Option<i64>,
    #[serde(rename = "tamanho_equipe", skip_serializing_if = "Option::is_none")]
    pub team_size: Option<i64>,
    #[serde(rename = "recursos_disponiveis", skip_serializing_if = "Option::is_none")]
    pub resource_level: Option<ResourceLevel>,
    #[serde(rename = "tipo_projeto", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(rename = "departamento", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "complexidade", skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(rename = "metodologia", skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    #[serde(rename = "risco", skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

impl Payload {
    /// Keys the prediction service requires, in its declaration order.
    pub const WIRE_KEYS: [&'static str; 13] = [
        "duracao_meses",
        "orcamento",
        "entregas",
        "tamanho_equipe",
        "recursos_disponiveis",
        "ano_inicio",
        "mes_inicio",
        "dia_semana",
        "tipo_projeto",
        "departamento",
        "complexidade",
        "metodologia",
        "risco",
    ];

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Start date if it reads as `dd/mm/yyyy`, otherwise the clock's today.
pub fn effective_start(record: &ProjectRecord, clock: &impl Clock) -> NaiveDate {
    match record.start_date.as_ref().and_then(|d| d.date) {
        Some(date) => date,
        None => {
            let today = clock.today();
            debug!(
                given = ?record.start_date.as_ref().map(|d| &d.text),
                fallback = %today,
                "no usable start date; using today"
            );
            today
        }
    }
}

fn non_blank(s: Option<&String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty()).cloned()
}

/// Reads the record only; the raw date text and rejected values never
/// reach the payload.
pub fn assemble_payload(record: &ProjectRecord, clock: &impl Clock) -> Payload {
    let start = effective_start(record, clock);
    Payload {
        year: start.year(),
        month: start.month(),
        iso_weekday: start.weekday().number_from_monday(),
        duration_months: record.duration_months,
        budget: record.budget,
        deliveries: record.deliveries,
        team_size: record.team_size,
        resource_level: record.resource_level,
        project_type: non_blank(record.project_type.valid()),
        department: non_blank(record.department.valid()),
        complexity: non_blank(record.complexity.valid()),
        methodology: non_blank(record.methodology.valid()),
        risk: non_blank(record.risk.valid()),
    }
}
