//! Five-step analysis wizard.
//!
//! `Symptoms → FreeText → Diet → Activity → Blood`, driven only by explicit
//! Next / Back actions. Leaving the symptom step requires every question to
//! be answered. Submission is only possible from the blood step and consumes
//! the wizard, so a finished session can never be resumed; a fresh `Wizard`
//! always starts at step 1 with an empty draft.

use serde::{Deserialize, Serialize};

use crate::models::enums::{Answer, RiskCategory};
use crate::models::{ActivityRecord, BloodPanel, SymptomAnswers, QUESTION_KEYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Symptoms,
    FreeText,
    Diet,
    Activity,
    Blood,
}

impl WizardStep {
    /// 1-based position shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Self::Symptoms => 1,
            Self::FreeText => 2,
            Self::Diet => 3,
            Self::Activity => 4,
            Self::Blood => 5,
        }
    }

    pub const fn total() -> u8 {
        5
    }

    /// Translation key for the step title.
    pub fn title_key(&self) -> &'static str {
        match self {
            Self::Symptoms => "analysis.step.symptoms",
            Self::FreeText => "analysis.step.freeText",
            Self::Diet => "analysis.step.diet",
            Self::Activity => "analysis.step.activity",
            Self::Blood => "analysis.step.blood",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Next,
    Back,
}

/// Transition table. `None` marks an illegal move.
pub fn transition(step: WizardStep, action: WizardAction) -> Option<WizardStep> {
    use WizardAction::*;
    use WizardStep::*;
    match (step, action) {
        (Symptoms, Next) => Some(FreeText),
        (FreeText, Next) => Some(Diet),
        (Diet, Next) => Some(Activity),
        (Activity, Next) => Some(Blood),
        (FreeText, Back) => Some(Symptoms),
        (Diet, Back) => Some(FreeText),
        (Activity, Back) => Some(Diet),
        (Blood, Back) => Some(Activity),
        (Symptoms, Back) | (Blood, Next) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step:?} is incomplete: {missing} question(s) unanswered")]
    IncompleteStep { step: WizardStep, missing: usize },
    #[error("No {action:?} transition from step {step:?}")]
    IllegalTransition { step: WizardStep, action: WizardAction },
    #[error("Submission is only possible from the blood step (current: {0:?})")]
    NotAtFinalStep(WizardStep),
}

/// Per-step payloads collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDraft {
    pub symptoms: SymptomAnswers,
    pub free_text: String,
    pub diet: String,
    pub activity: ActivityRecord,
    pub blood: BloodPanel,
    pub uploaded_file: Option<String>,
}

/// Frozen draft handed to the analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub symptoms: SymptomAnswers,
    pub free_text: String,
    pub diet: String,
    pub activity: ActivityRecord,
    /// `None` when the user skipped the blood step.
    pub blood: Option<BloodPanel>,
    pub uploaded_file: Option<String>,
}

impl Submission {
    pub fn skipped_blood(&self) -> bool {
        self.blood.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    draft: WizardDraft,
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Symptoms
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn answer(&mut self, question: &str, answer: Answer) -> bool {
        self.draft.symptoms.set(question, answer)
    }

    pub fn set_free_text(&mut self, text: impl Into<String>) {
        self.draft.free_text = text.into();
    }

    pub fn set_diet(&mut self, text: impl Into<String>) {
        self.draft.diet = text.into();
    }

    pub fn set_activity(&mut self, activity: ActivityRecord) {
        self.draft.activity = activity;
    }

    pub fn set_blood_value(&mut self, field: &str, value: impl Into<String>) -> bool {
        self.draft.blood.set(field, value)
    }

    /// Only the file name is kept; the image itself is never read.
    pub fn attach_file(&mut self, name: impl Into<String>) {
        self.draft.uploaded_file = Some(name.into());
    }

    /// Whether the "next" control is enabled on the current step.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Symptoms => self.draft.symptoms.is_complete(),
            WizardStep::Blood => false,
            _ => true,
        }
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let target = transition(self.step, WizardAction::Next).ok_or(
            WizardError::IllegalTransition {
                step: self.step,
                action: WizardAction::Next,
            },
        )?;
        if !self.can_advance() {
            return Err(WizardError::IncompleteStep {
                step: self.step,
                missing: self.draft.symptoms.unanswered().len(),
            });
        }
        self.step = target;
        Ok(target)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let target = transition(self.step, WizardAction::Back).ok_or(
            WizardError::IllegalTransition {
                step: self.step,
                action: WizardAction::Back,
            },
        )?;
        self.step = target;
        Ok(target)
    }

    /// Freeze the draft. With `skip_blood` any typed blood values are dropped.
    /// On error the wizard is handed back unchanged.
    pub fn submit(self, skip_blood: bool) -> Result<Submission, (Self, WizardError)> {
        if self.step != WizardStep::Blood {
            let step = self.step;
            return Err((self, WizardError::NotAtFinalStep(step)));
        }
        let WizardDraft {
            symptoms,
            free_text,
            diet,
            activity,
            blood,
            uploaded_file,
        } = self.draft;
        Ok(Submission {
            symptoms,
            free_text,
            diet,
            activity,
            blood: if skip_blood { None } else { Some(blood) },
            uploaded_file,
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Local symptom scoring (used when the remote analysis fails)
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomScore {
    pub score: u32,
    pub max_score: u32,
    /// 0–100, higher is worse.
    pub risk_score: u8,
    /// 0–100, higher is healthier. Always `100 - risk_score`.
    pub chart_score: u8,
    pub category: RiskCategory,
}

/// yes = 2, sometimes = 1, no = 0, over the full questionnaire.
pub fn score_symptoms(answers: &SymptomAnswers) -> SymptomScore {
    let score: u32 = answers.iter().map(|(_, a)| a.points()).sum();
    let max_score = 2 * QUESTION_KEYS.len() as u32;
    let ratio = f64::from(score) / f64::from(max_score);

    let risk_score = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;
    let category = if ratio <= 0.3 {
        RiskCategory::Low
    } else if ratio <= 0.6 {
        RiskCategory::Moderate
    } else {
        RiskCategory::High
    };

    SymptomScore {
        score,
        max_score,
        risk_score,
        chart_score: 100 - risk_score,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(answer: Answer) -> SymptomAnswers {
        QUESTION_KEYS.iter().map(|q| (*q, answer)).collect()
    }

    fn wizard_at_blood() -> Wizard {
        let mut w = Wizard::new();
        for q in QUESTION_KEYS {
            w.answer(q, Answer::No);
        }
        for _ in 0..4 {
            w.next().unwrap();
        }
        w
    }

    #[test]
    fn starts_at_step_one_with_empty_draft() {
        let w = Wizard::new();
        assert_eq!(w.step(), WizardStep::Symptoms);
        assert_eq!(w.step().number(), 1);
        assert!(w.draft().symptoms.is_empty());
    }

    #[test]
    fn next_disabled_until_every_question_answered() {
        let mut w = Wizard::new();
        for q in &QUESTION_KEYS[..9] {
            w.answer(q, Answer::Yes);
        }
        assert!(!w.can_advance());
        assert_eq!(
            w.next(),
            Err(WizardError::IncompleteStep {
                step: WizardStep::Symptoms,
                missing: 1
            })
        );
        assert_eq!(w.step(), WizardStep::Symptoms);

        w.answer("q10", Answer::Sometimes);
        assert!(w.can_advance());
        assert_eq!(w.next(), Ok(WizardStep::FreeText));
    }

    #[test]
    fn walks_forward_and_back() {
        let mut w = wizard_at_blood();
        assert_eq!(w.step(), WizardStep::Blood);
        assert_eq!(w.back(), Ok(WizardStep::Activity));
        assert_eq!(w.back(), Ok(WizardStep::Diet));
        assert_eq!(w.next(), Ok(WizardStep::Activity));
    }

    #[test]
    fn cannot_go_back_from_first_or_forward_from_last() {
        let mut w = Wizard::new();
        assert!(matches!(w.back(), Err(WizardError::IllegalTransition { .. })));

        let mut w = wizard_at_blood();
        assert!(!w.can_advance());
        assert!(matches!(w.next(), Err(WizardError::IllegalTransition { .. })));
    }

    #[test]
    fn transition_table_is_linear() {
        let order = [
            WizardStep::Symptoms,
            WizardStep::FreeText,
            WizardStep::Diet,
            WizardStep::Activity,
            WizardStep::Blood,
        ];
        for pair in order.windows(2) {
            assert_eq!(transition(pair[0], WizardAction::Next), Some(pair[1]));
            assert_eq!(transition(pair[1], WizardAction::Back), Some(pair[0]));
        }
    }

    #[test]
    fn submit_before_blood_step_returns_wizard() {
        let w = Wizard::new();
        let (w, err) = w.submit(false).unwrap_err();
        assert_eq!(err, WizardError::NotAtFinalStep(WizardStep::Symptoms));
        assert_eq!(w.step(), WizardStep::Symptoms);
    }

    #[test]
    fn skip_blood_drops_typed_values() {
        let mut w = wizard_at_blood();
        w.set_blood_value("ldl", "3.1");
        let submission = w.submit(true).unwrap();
        assert!(submission.skipped_blood());
        assert!(submission.blood.is_none());
    }

    #[test]
    fn submit_with_blood_keeps_panel_and_file_name() {
        let mut w = wizard_at_blood();
        w.set_blood_value("glucose", "5.2");
        w.attach_file("panel.jpg");
        let submission = w.submit(false).unwrap();
        assert_eq!(submission.blood.unwrap().glucose, "5.2");
        assert_eq!(submission.uploaded_file.as_deref(), Some("panel.jpg"));
    }

    #[test]
    fn example_scenario_scores_low() {
        let mut answers = all(Answer::No);
        answers.set("q1", Answer::Yes);
        answers.set("q3", Answer::Sometimes);
        let s = score_symptoms(&answers);
        assert_eq!(s.max_score, 20);
        assert_eq!(s.score, 3);
        assert_eq!(s.risk_score, 15);
        assert_eq!(s.chart_score, 85);
        assert_eq!(s.category, RiskCategory::Low);
    }

    #[test]
    fn chart_score_is_inverse_of_risk_for_many_answer_sets() {
        let options = [Answer::Yes, Answer::No, Answer::Sometimes];
        // Walk a deterministic spread of answer combinations.
        for seed in 0..3u32.pow(6) {
            let mut n = seed;
            let answers: SymptomAnswers = QUESTION_KEYS
                .iter()
                .map(|q| {
                    let a = options[(n % 3) as usize];
                    n = n / 3 + seed % 7;
                    (*q, a)
                })
                .collect();
            let s = score_symptoms(&answers);
            assert!(s.risk_score <= 100);
            assert_eq!(u32::from(s.chart_score), 100 - u32::from(s.risk_score));
        }
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(score_symptoms(&all(Answer::No)).category, RiskCategory::Low);
        // 10 points of 20 → ratio 0.5
        assert_eq!(
            score_symptoms(&all(Answer::Sometimes)).category,
            RiskCategory::Moderate
        );
        let worst = score_symptoms(&all(Answer::Yes));
        assert_eq!(worst.category, RiskCategory::High);
        assert_eq!(worst.risk_score, 100);
        assert_eq!(worst.chart_score, 0);
    }

    #[test]
    fn stored_answers_with_extra_keys_stay_within_max_score() {
        let answers: SymptomAnswers = serde_json::from_str(
            r#"{"q1":"yes","q2":"yes","q3":"yes","q4":"yes","q5":"yes","q6":"yes",
                "q7":"yes","q8":"yes","q9":"yes","q10":"yes","q11":"yes","q12":"yes"}"#,
        )
        .unwrap();
        let s = score_symptoms(&answers);
        assert_eq!(s.score, 20);
        assert_eq!(s.score, s.max_score);
    }
}
