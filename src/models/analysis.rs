use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AnalysisSource, RiskCategory};
use super::intake::{ActivityRecord, BloodPanel, SymptomAnswers};

/// Risk score substituted when the model reply cannot be parsed.
pub const FALLBACK_RISK_SCORE: u8 = 50;
/// Chart score substituted when the model reply cannot be parsed.
pub const FALLBACK_CHART_SCORE: u8 = 50;
/// Expected score of a healthy person when nothing better is known.
pub const DEFAULT_NORMAL_SCORE: u8 = 85;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRisk {
    pub name: String,
    /// Percent, 0–100.
    pub risk: u8,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub relevance: String,
}

/// Fixed-shape assessment returned by the analysis function.
///
/// `Default` is the fallback record: neutral scores, empty lists,
/// no blood score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    pub verdict: String,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub short_term_measures: Vec<String>,
    pub long_term_measures: Vec<String>,
    pub diseases: Vec<DiseaseRisk>,
    pub needs_hospital: bool,
    pub hospital_message: String,
    pub next_analysis_message: String,
    pub symptoms_chart_score: u8,
    pub blood_chart_score: Option<u8>,
    pub normal_health_score: u8,
    pub normal_score_justification: String,
    pub normal_symptoms_info: String,
    pub normal_blood_info: String,
    pub data_limitations: String,
    pub references: Vec<Reference>,
}

impl Default for Assessment {
    fn default() -> Self {
        Self {
            verdict: String::new(),
            risk_score: FALLBACK_RISK_SCORE,
            risk_category: RiskCategory::Moderate,
            short_term_measures: Vec::new(),
            long_term_measures: Vec::new(),
            diseases: Vec::new(),
            needs_hospital: false,
            hospital_message: String::new(),
            next_analysis_message: String::new(),
            symptoms_chart_score: FALLBACK_CHART_SCORE,
            blood_chart_score: None,
            normal_health_score: DEFAULT_NORMAL_SCORE,
            normal_score_justification: String::new(),
            normal_symptoms_info: String::new(),
            normal_blood_info: String::new(),
            data_limitations: String::new(),
            references: Vec::new(),
        }
    }
}

impl Assessment {
    /// Fallback record carrying the unparsed reply as its verdict.
    pub fn fallback(verdict: impl Into<String>) -> Self {
        Self {
            verdict: verdict.into(),
            ..Self::default()
        }
    }
}

/// One stored analysis: the assessment plus the inputs it was made from.
/// Appended to history, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub source: AnalysisSource,
    #[serde(flatten)]
    pub assessment: Assessment,
    pub symptoms_raw: SymptomAnswers,
    #[serde(default)]
    pub free_text: String,
    #[serde(default)]
    pub diet: String,
    #[serde(default)]
    pub activity: ActivityRecord,
    pub blood_data_raw: Option<BloodPanel>,
    #[serde(default)]
    pub uploaded_file: Option<String>,
}

impl AnalysisRecord {
    pub fn risk_score(&self) -> u8 {
        self.assessment.risk_score
    }

    pub fn symptoms_chart_score(&self) -> u8 {
        self.assessment.symptoms_chart_score
    }

    pub fn blood_chart_score(&self) -> Option<u8> {
        self.assessment.blood_chart_score
    }
}
