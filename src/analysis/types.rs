use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::i18n::Lang;
use crate::models::enums::AnalysisSource;
use crate::models::{
    ActivityRecord, AnalysisRecord, Assessment, BloodPanel, PrescriptionResult, SymptomAnswers,
    UserProfile,
};

// ═══════════════════════════════════════════════════════════
// Request — `{type, lang, data}` on the wire
// ═══════════════════════════════════════════════════════════

/// Prior result summary sent along with a new analysis.
/// Full stored records deserialize into this too; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorScore {
    pub date: DateTime<Utc>,
    pub symptoms_chart_score: u8,
    pub blood_chart_score: Option<u8>,
}

impl From<&AnalysisRecord> for PriorScore {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            date: record.date,
            symptoms_chart_score: record.symptoms_chart_score(),
            blood_chart_score: record.blood_chart_score(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalAnalysisData {
    pub symptoms: SymptomAnswers,
    pub free_text: String,
    pub diet: String,
    pub activity: ActivityRecord,
    pub blood_data: Option<BloodPanel>,
    pub user_profile: Option<UserProfile>,
    pub previous_analyses: Vec<PriorScore>,
}

impl MedicalAnalysisData {
    pub fn has_heart_rate(&self) -> bool {
        self.activity.has_heart_rate()
    }

    pub fn has_blood_data(&self) -> bool {
        self.blood_data.as_ref().is_some_and(BloodPanel::has_values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionData {
    pub prescription_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    MedicalAnalysis(Box<MedicalAnalysisData>),
    Prescription(PrescriptionData),
}

impl AnalysisPayload {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::MedicalAnalysis(_) => "medical_analysis",
            Self::Prescription(_) => "prescription",
        }
    }
}

/// Request accepted by the analysis function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest", into = "RawRequest")]
pub struct AnalysisRequest {
    pub lang: Lang,
    pub payload: AnalysisPayload,
}

impl AnalysisRequest {
    pub fn medical(lang: Lang, data: MedicalAnalysisData) -> Self {
        Self {
            lang,
            payload: AnalysisPayload::MedicalAnalysis(Box::new(data)),
        }
    }

    pub fn prescription(lang: Lang, text: impl Into<String>) -> Self {
        Self {
            lang,
            payload: AnalysisPayload::Prescription(PrescriptionData {
                prescription_text: text.into(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawRequest {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    lang: Lang,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<RawRequest> for AnalysisRequest {
    type Error = String;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let data = if raw.data.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            raw.data
        };
        let payload = match raw.kind.as_str() {
            "medical_analysis" => AnalysisPayload::MedicalAnalysis(Box::new(
                serde_json::from_value(data).map_err(|e| format!("invalid data: {e}"))?,
            )),
            "prescription" => AnalysisPayload::Prescription(
                serde_json::from_value(data).map_err(|e| format!("invalid data: {e}"))?,
            ),
            other => return Err(format!("unknown request type '{other}'")),
        };
        Ok(Self {
            lang: raw.lang,
            payload,
        })
    }
}

impl From<AnalysisRequest> for RawRequest {
    fn from(req: AnalysisRequest) -> Self {
        let kind = req.payload.type_tag().to_string();
        let data = match req.payload {
            AnalysisPayload::MedicalAnalysis(d) => serde_json::to_value(*d),
            AnalysisPayload::Prescription(d) => serde_json::to_value(d),
        }
        .unwrap_or_default();
        Self {
            kind,
            lang: req.lang,
            data,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Reply and outcome
// ═══════════════════════════════════════════════════════════

/// Response header naming where an assessment came from (`model` | `fallback`).
pub const SOURCE_HEADER: &str = "x-analysis-source";

/// Body returned by the analysis function on success.
/// Callers know which kind they asked for and deserialize the inner type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisReply {
    Assessment(Box<Assessment>),
    Prescription(PrescriptionResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited,
    PaymentRequired,
    Internal,
}

/// A failed analysis call, with the message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalysisFailure {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Internal,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for AnalysisFailure {
    fn from(err: GatewayError) -> Self {
        let kind = err.failure_kind();
        let message = match kind {
            FailureKind::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
            FailureKind::PaymentRequired => "Payment required.".to_string(),
            FailureKind::Internal => match err {
                GatewayError::MissingApiKey(_) => err.to_string(),
                _ => "AI gateway error".to_string(),
            },
        };
        Self { kind, message }
    }
}

/// Result of one analysis attempt.
///
/// `Model` is genuine model output, `Fallback` is the fixed substitute used
/// when the reply could not be parsed, `Error` means no record at all.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<T> {
    Model(T),
    Fallback(T),
    Error(AnalysisFailure),
}

impl<T> AnalysisOutcome<T> {
    pub fn source(&self) -> Option<AnalysisSource> {
        match self {
            Self::Model(_) => Some(AnalysisSource::Model),
            Self::Fallback(_) => Some(AnalysisSource::Fallback),
            Self::Error(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> AnalysisOutcome<U> {
        match self {
            Self::Model(v) => AnalysisOutcome::Model(f(v)),
            Self::Fallback(v) => AnalysisOutcome::Fallback(f(v)),
            Self::Error(e) => AnalysisOutcome::Error(e),
        }
    }

    pub fn into_result(self) -> Result<(T, AnalysisSource), AnalysisFailure> {
        match self {
            Self::Model(v) => Ok((v, AnalysisSource::Model)),
            Self::Fallback(v) => Ok((v, AnalysisSource::Fallback)),
            Self::Error(e) => Err(e),
        }
    }
}

/// Text-generation backend abstraction (allows mocking).
pub trait LlmClient {
    /// Send one system + user prompt pair, return the raw reply text.
    fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError>;
}
