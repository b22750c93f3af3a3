//! # Coverage Scorer
//! A heuristic quality signal for a reply, from 0 to 5. It is not a correctness check.
//!
//! * +1 for each of the required keys `itinerario_resumido`, `mensaje_whatsapp` and `hoteldo_filtros`
//! * +1 if the filters have a destination and both dates
//! * +1 if there is a checklist and every entry is `"OK"`

use serde_json::Value;

use crate::mock::MockOutput;
use crate::runner::RunResult;

pub const REQUIRED_KEYS: [&str; 3] = ["itinerario_resumido", "mensaje_whatsapp", "hoteldo_filtros"];
pub const REQUIRED_FILTERS: [&str; 3] = ["destino", "fecha_desde", "fecha_hasta"];
pub const MAX_SCORE: f64 = 5.0;

/// Score the output of a run.
pub fn coverage_score(result: &RunResult) -> f64 {
    score_output(&result.output)
}

/// Score a mocked reply. Its required keys are always present.
pub fn score_output(output: &MockOutput) -> f64 {
    let mut score = REQUIRED_KEYS.len() as f64;
    let filters = &output.filters;
    if [&filters.destination, &filters.date_from, &filters.date_to].iter().all(|s| !s.is_empty()) {
        score += 1.0;
    }
    if !output.checks.is_empty() && output.checks.iter().all(|check| check.status.is_ok()) {
        score += 1.0;
    }
    score
}

/// Score any JSON reply with the same rules, e.g. a real model's answer parsed from text.
///
/// # Example
/// ```
/// use fastprompt::scoring::coverage_score_value;
/// use serde_json::json;
///
/// let reply = json!({
///     "itinerario_resumido": "...",
///     "hoteldo_filtros": {"destino": "Lima", "fecha_desde": "2025-03-01", "fecha_hasta": ""},
///     "checks": [{"destino": "OK"}],
/// });
/// assert_eq!(coverage_score_value(&reply), 3.0);
/// ```
pub fn coverage_score_value(output: &Value) -> f64 {
    let mut score = REQUIRED_KEYS.iter().filter(|key| output.get(**key).is_some()).count() as f64;
    let filters = output.get("hoteldo_filtros");
    if REQUIRED_FILTERS.iter().all(|key| filters.and_then(|f| f.get(*key)).map_or(false, truthy)) {
        score += 1.0;
    }
    let checks = output.get("checks").and_then(Value::as_array);
    if let Some(checks) = checks {
        if !checks.is_empty() && checks.iter().all(check_passed) {
            score += 1.0;
        }
    }
    score
}

/// Truthiness of a JSON value: null, false, zero and empty strings or containers are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A check entry is a single-entry object whose value is `"OK"`.
fn check_passed(check: &Value) -> bool {
    check
        .as_object()
        .and_then(|entry| entry.values().next())
        .map_or(false, |status| status == "OK")
}
