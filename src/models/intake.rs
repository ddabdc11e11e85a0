//! Typed payloads collected by the analysis wizard.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::enums::Answer;

/// The ten questionnaire keys, in display order.
pub const QUESTION_KEYS: &[&str] = &[
    "q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9", "q10",
];

/// Questionnaire answers keyed by question id (`q1`..`q10`).
///
/// Keys outside `QUESTION_KEYS` are dropped, including on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymptomAnswers(BTreeMap<String, Answer>);

impl<'de> Deserialize<'de> for SymptomAnswers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Answer>::deserialize(deserializer)?;
        let mut answers = Self::new();
        for (question, answer) in raw {
            if !answers.set(&question, answer) {
                tracing::debug!(question = %question, "Dropping unknown questionnaire key");
            }
        }
        Ok(answers)
    }
}

impl SymptomAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Unknown question keys are ignored.
    pub fn set(&mut self, question: &str, answer: Answer) -> bool {
        if !QUESTION_KEYS.contains(&question) {
            return false;
        }
        self.0.insert(question.to_string(), answer);
        true
    }

    pub fn get(&self, question: &str) -> Option<Answer> {
        self.0.get(question).copied()
    }

    /// True once every question in `QUESTION_KEYS` has an answer.
    pub fn is_complete(&self) -> bool {
        QUESTION_KEYS.iter().all(|q| self.0.contains_key(*q))
    }

    pub fn unanswered(&self) -> Vec<&'static str> {
        QUESTION_KEYS
            .iter()
            .copied()
            .filter(|q| !self.0.contains_key(*q))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Answer)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(&'static str, Answer)> for SymptomAnswers {
    fn from_iter<I: IntoIterator<Item = (&'static str, Answer)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (q, a) in iter {
            answers.set(q, a);
        }
        answers
    }
}

/// Physical activity and lifestyle step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityRecord {
    pub exercise: String,
    pub sleep: String,
    pub stress: String,
    /// Resting heart rate in bpm, as typed. Empty when skipped.
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub heart_rate: String,
}

impl ActivityRecord {
    pub fn has_heart_rate(&self) -> bool {
        !self.heart_rate.trim().is_empty()
    }
}

/// Blood panel values, kept as typed so empty fields stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodPanel {
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub cholesterol: String,
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub hdl: String,
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub ldl: String,
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub triglycerides: String,
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub glucose: String,
    #[serde(deserialize_with = "super::flexible::text_or_number")]
    pub hemoglobin: String,
}

impl BloodPanel {
    pub const FIELDS: &'static [&'static str] =
        &["cholesterol", "hdl", "ldl", "triglycerides", "glucose", "hemoglobin"];

    fn values(&self) -> [&str; 6] {
        [
            &self.cholesterol,
            &self.hdl,
            &self.ldl,
            &self.triglycerides,
            &self.glucose,
            &self.hemoglobin,
        ]
    }

    /// True if at least one field carries a value.
    pub fn has_values(&self) -> bool {
        self.values().iter().any(|v| !v.trim().is_empty())
    }

    /// Set a field by name. Returns false for unknown field names.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "cholesterol" => &mut self.cholesterol,
            "hdl" => &mut self.hdl,
            "ldl" => &mut self.ldl,
            "triglycerides" => &mut self.triglycerides,
            "glucose" => &mut self.glucose,
            "hemoglobin" => &mut self.hemoglobin,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_only_when_all_ten_answered() {
        let mut answers = SymptomAnswers::new();
        for q in &QUESTION_KEYS[..9] {
            answers.set(q, Answer::No);
        }
        assert!(!answers.is_complete());
        assert_eq!(answers.unanswered(), vec!["q10"]);
        answers.set("q10", Answer::Yes);
        assert!(answers.is_complete());
    }

    #[test]
    fn unknown_question_ignored() {
        let mut answers = SymptomAnswers::new();
        assert!(!answers.set("q11", Answer::Yes));
        assert!(answers.is_empty());
    }

    #[test]
    fn answers_serialize_as_plain_map() {
        let answers: SymptomAnswers = [("q1", Answer::Yes), ("q2", Answer::Sometimes)]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"q1": "yes", "q2": "sometimes"}));
    }

    #[test]
    fn deserialization_drops_unknown_keys() {
        let answers: SymptomAnswers =
            serde_json::from_str(r#"{"q1": "yes", "q11": "yes", "extra": "no"}"#).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("q1"), Some(Answer::Yes));
        assert_eq!(answers.get("q11"), None);
    }

    #[test]
    fn numeric_form_values_are_kept_as_text() {
        let activity: ActivityRecord = serde_json::from_str(r#"{"heartRate": 72}"#).unwrap();
        assert_eq!(activity.heart_rate, "72");
        assert!(activity.has_heart_rate());

        let panel: BloodPanel =
            serde_json::from_str(r#"{"glucose": 5.4, "ldl": null}"#).unwrap();
        assert_eq!(panel.glucose, "5.4");
        assert!(panel.ldl.is_empty());
        assert!(panel.has_values());
    }

    #[test]
    fn blank_blood_panel_has_no_values() {
        let mut panel = BloodPanel::default();
        panel.set("ldl", "  ");
        assert!(!panel.has_values());
        panel.set("glucose", "5.4");
        assert!(panel.has_values());
        assert!(!panel.set("ferritin", "10"));
    }

    #[test]
    fn heart_rate_whitespace_counts_as_missing() {
        let activity = ActivityRecord {
            heart_rate: " ".into(),
            ..Default::default()
        };
        assert!(!activity.has_heart_rate());
    }
}
