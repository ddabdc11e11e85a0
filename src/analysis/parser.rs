use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::enums::RiskCategory;
use crate::models::{
    Assessment, DiseaseRisk, PrescribedMedication, PrescriptionResult, Reference,
    DEFAULT_NORMAL_SCORE, FALLBACK_CHART_SCORE, FALLBACK_RISK_SCORE,
};

static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid regex"));
static BARE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").expect("valid regex"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReplyParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("reply JSON is not an object")]
    NotAnObject,
}

/// Pick the JSON candidate out of a model reply: the first ```json block,
/// else the first bare fenced block, else the whole reply.
pub fn extract_json_block(reply: &str) -> &str {
    JSON_FENCE_RE
        .captures(reply)
        .or_else(|| BARE_FENCE_RE.captures(reply))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply)
        .trim()
}

fn parse_object(reply: &str) -> Result<Map<String, Value>, ReplyParseError> {
    let value: Value = serde_json::from_str(extract_json_block(reply))
        .map_err(|e| ReplyParseError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ReplyParseError::NotAnObject),
    }
}

/// Coerce a model reply into the fixed assessment shape.
///
/// Missing fields take the fallback defaults, scores are clamped to 0–100,
/// list entries that do not fit are dropped. Only a reply that is not a JSON
/// object at all is an error.
pub fn parse_assessment(reply: &str) -> Result<Assessment, ReplyParseError> {
    let obj = parse_object(reply)?;

    Ok(Assessment {
        verdict: text(&obj, "verdict"),
        risk_score: score(obj.get("riskScore")).unwrap_or(FALLBACK_RISK_SCORE),
        risk_category: obj
            .get("riskCategory")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().to_lowercase().parse::<RiskCategory>().ok())
            .unwrap_or_default(),
        short_term_measures: string_list(obj.get("shortTermMeasures")),
        long_term_measures: string_list(obj.get("longTermMeasures")),
        diseases: parse_diseases(obj.get("diseases")),
        needs_hospital: obj
            .get("needsHospital")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        hospital_message: text(&obj, "hospitalMessage"),
        next_analysis_message: text(&obj, "nextAnalysisMessage"),
        symptoms_chart_score: score(obj.get("symptomsChartScore")).unwrap_or(FALLBACK_CHART_SCORE),
        blood_chart_score: score(obj.get("bloodChartScore")),
        normal_health_score: score(obj.get("normalHealthScore")).unwrap_or(DEFAULT_NORMAL_SCORE),
        normal_score_justification: text(&obj, "normalScoreJustification"),
        normal_symptoms_info: text(&obj, "normalSymptomsInfo"),
        normal_blood_info: text(&obj, "normalBloodInfo"),
        data_limitations: text(&obj, "dataLimitations"),
        references: parse_array_lenient::<Reference>(obj.get("references")),
    })
}

/// Coerce a pharmacist reply into a `PrescriptionResult`.
pub fn parse_prescription(reply: &str) -> Result<PrescriptionResult, ReplyParseError> {
    let obj = parse_object(reply)?;
    Ok(PrescriptionResult {
        medications: parse_array_lenient::<PrescribedMedication>(obj.get("medications"))
            .into_iter()
            .filter(|m| !m.name.trim().is_empty())
            .collect(),
        advice: text(&obj, "advice"),
    })
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Numeric score from a number or numeric string, rounded and clamped.
fn score(value: Option<&Value>) -> Option<u8> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_diseases(value: Option<&Value>) -> Vec<DiseaseRisk> {
    let Some(arr) = value.and_then(Value::as_array) else {
        return vec![];
    };
    arr.iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let name = obj.get("name")?.as_str()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(DiseaseRisk {
                name: name.to_string(),
                risk: score(obj.get("risk"))?,
                reasoning: text(obj, "reasoning"),
            })
        })
        .collect()
}

/// Parse an array leniently, skipping items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Vec<T> {
    match value.and_then(Value::as_array) {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}
