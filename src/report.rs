//! Human-readable prediction report.

use std::fmt::Display;

use crate::predict::Prediction;
use crate::record::{FieldState, ProjectRecord};

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// `0.8134` → `"81.3%"`.
pub fn format_probability(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn or_dash<T: Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn categorical(state: &FieldState<String>) -> String {
    or_dash(state.valid())
}

pub fn format_report(prediction: &Prediction, record: &ProjectRecord) -> String {
    let lines = [
        format!("Duração: {} meses", or_dash(record.duration_months)),
        format!(
            "Orçamento: R$ {}",
            or_dash(record.budget.map(format_currency))
        ),
        format!("Entregas: {}", or_dash(record.deliveries)),
        format!("Equipe: {} pessoas", or_dash(record.team_size)),
        format!(
            "Recursos: {}",
            or_dash(record.resource_level.map(|l| l.word()))
        ),
        format!(
            "Data de início: {}",
            or_dash(record.start_date.as_ref().map(|d| &d.text))
        ),
        format!("Tipo: {}", categorical(&record.project_type)),
        format!("Departamento: {}", categorical(&record.department)),
        format!("Complexidade: {}", categorical(&record.complexity)),
        format!("Metodologia: {}", categorical(&record.methodology)),
        format!("Risco: {}", categorical(&record.risk)),
    ];

    let verdict = if prediction.success {
        "✅ SUCESSO"
    } else {
        "❌ FRACASSO"
    };

    format!(
        "🎯 Previsão de Sucesso do Projeto\n\n{}\n\n📊 Resultado: {} 📈 Probabilidade: {}\n",
        lines.join("\n"),
        verdict,
        format_probability(prediction.probability)
    )
}
