//! Read-only projection of analysis history into chart series.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::enums::RiskCategory;
use crate::models::{AnalysisRecord, DiseaseRisk};

/// Healthy-person reference line when no record carries a better value.
pub const NORMAL_BASELINE: u8 = 85;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// 1-based position in the full history.
    pub index: usize,
    pub date: DateTime<Utc>,
    pub score: u8,
    pub baseline: u8,
}

/// What the results page shows for the most recent record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictSummary<'a> {
    pub date: DateTime<Utc>,
    pub verdict: &'a str,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub needs_hospital: bool,
    pub hospital_message: &'a str,
    pub next_analysis_message: &'a str,
    pub short_term_measures: &'a [String],
    pub long_term_measures: &'a [String],
    pub diseases: &'a [DiseaseRisk],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProjection<'a> {
    pub baseline: u8,
    pub symptoms: Vec<ChartPoint>,
    pub blood: Vec<ChartPoint>,
    pub latest: Option<VerdictSummary<'a>>,
}

impl ChartProjection<'_> {
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

/// Project an ordered history (oldest first).
pub fn project(history: &[AnalysisRecord]) -> ChartProjection<'_> {
    let baseline = history
        .last()
        .map(|r| r.assessment.normal_health_score)
        .unwrap_or(NORMAL_BASELINE);

    let symptoms = history
        .iter()
        .enumerate()
        .map(|(i, r)| ChartPoint {
            index: i + 1,
            date: r.date,
            score: r.symptoms_chart_score(),
            baseline,
        })
        .collect();

    let blood = history
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.blood_chart_score().map(|score| ChartPoint {
                index: i + 1,
                date: r.date,
                score,
                baseline,
            })
        })
        .collect();

    let latest = history.last().map(|r| VerdictSummary {
        date: r.date,
        verdict: &r.assessment.verdict,
        risk_score: r.risk_score(),
        risk_category: r.assessment.risk_category,
        needs_hospital: r.assessment.needs_hospital,
        hospital_message: &r.assessment.hospital_message,
        next_analysis_message: &r.assessment.next_analysis_message,
        short_term_measures: &r.assessment.short_term_measures,
        long_term_measures: &r.assessment.long_term_measures,
        diseases: &r.assessment.diseases,
    });

    ChartProjection {
        baseline,
        symptoms,
        blood,
        latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::AnalysisSource;
    use crate::models::{ActivityRecord, Assessment, SymptomAnswers};
    use uuid::Uuid;

    fn disease(name: &str, risk: u8) -> DiseaseRisk {
        DiseaseRisk {
            name: name.into(),
            risk,
            reasoning: String::new(),
        }
    }

    fn record(symptoms: u8, blood: Option<u8>, normal: u8) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            date: Utc::now(),
            source: AnalysisSource::Model,
            assessment: Assessment {
                verdict: format!("score {symptoms}"),
                symptoms_chart_score: symptoms,
                blood_chart_score: blood,
                normal_health_score: normal,
                ..Assessment::default()
            },
            symptoms_raw: SymptomAnswers::new(),
            free_text: String::new(),
            diet: String::new(),
            activity: ActivityRecord::default(),
            blood_data_raw: None,
            uploaded_file: None,
        }
    }

    #[test]
    fn empty_history_uses_constant_baseline() {
        let p = project(&[]);
        assert!(p.is_empty());
        assert_eq!(p.baseline, NORMAL_BASELINE);
        assert!(p.latest.is_none());
    }

    #[test]
    fn blood_series_skips_records_without_blood_score() {
        let history = vec![record(70, Some(60), 85), record(75, None, 85), record(80, Some(65), 88)];
        let p = project(&history);
        assert_eq!(p.symptoms.len(), 3);
        assert_eq!(
            p.symptoms.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            p.blood.iter().map(|c| (c.index, c.score)).collect::<Vec<_>>(),
            vec![(1, 60), (3, 65)]
        );
    }

    #[test]
    fn baseline_and_summary_come_from_latest_record() {
        let mut older = record(70, None, 85);
        older.assessment.diseases = vec![disease("Angina", 40)];
        let mut latest = record(90, None, 91);
        latest.assessment.needs_hospital = true;
        latest.assessment.diseases = vec![disease("Hypertension", 25), disease("Arrhythmia", 10)];
        let history = vec![older, latest];

        let p = project(&history);
        assert_eq!(p.baseline, 91);
        assert!(p.symptoms.iter().all(|c| c.baseline == 91));
        let summary = p.latest.unwrap();
        assert_eq!(summary.verdict, "score 90");
        assert!(summary.needs_hospital);
        assert_eq!(
            summary.diseases.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec!["Hypertension", "Arrhythmia"]
        );
    }
}
