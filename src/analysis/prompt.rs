use super::types::{MedicalAnalysisData, PriorScore};
use crate::i18n::Lang;
use crate::models::{BloodPanel, UserProfile};

const HEART_RATE_RULE: &str = "\
- No resting heart rate was given. Do not assess any condition that depends on \
heart rate (tachycardia, bradycardia, arrhythmia, rate-based atrial fibrillation). \
Limit the disease list to what symptoms, lifestyle and the other data support.";

const BLOOD_RULE: &str = "\
- No blood test values were given. Do not assess any condition that depends on \
laboratory values (dyslipidemia, hypercholesterolemia, glucose-based diabetes or \
prediabetes, hemoglobin-based anemia). Set \"bloodChartScore\" to null.";

/// System prompt for a cardiovascular assessment.
///
/// The two evidentiary rules are only included when the matching data is
/// missing from the request.
pub fn build_medical_system_prompt(lang: Lang, has_heart_rate: bool, has_blood: bool) -> String {
    let language = lang.language_name();
    let mut rules = String::new();
    if !has_heart_rate {
        rules.push_str(HEART_RATE_RULE);
        rules.push('\n');
    }
    if !has_blood {
        rules.push_str(BLOOD_RULE);
        rules.push('\n');
    }

    format!(
        r#"You are an experienced cardiologist assistant. Base every judgement on published
clinical guidance (ESC and AHA/ACC cardiovascular risk guidelines, WHO prevention
guidance) and stay objective.

Write the whole answer in {language}. Every string value must be in {language}.

SCORING:
- "symptomsChartScore" is a HEALTH score from symptoms alone: 0 means severe
  symptoms, 100 means none. Mild or few symptoms give 70-95, many severe ones 10-40.
- "riskScore" is the inverse notion: 0 means no risk, 100 maximum risk. A
  symptomsChartScore of 80 goes with a riskScore near 15-30.
- "normalHealthScore" is what a healthy person of the same age and gender would
  score, usually 82-92 (younger is higher). Explain it in "normalScoreJustification".
- For each disease risk, cite a guideline or a published study in "references".
{rules}
Answer with JSON only, in a ```json fenced block, using exactly these keys:
{{
  "verdict": "detailed verdict consistent with the scores",
  "riskScore": 0-100,
  "riskCategory": "low|moderate|high|critical",
  "shortTermMeasures": ["..."],
  "longTermMeasures": ["..."],
  "diseases": [{{"name": "...", "risk": 0-100, "reasoning": "why, from the data given"}}],
  "needsHospital": true|false,
  "hospitalMessage": "...",
  "nextAnalysisMessage": "when to repeat the assessment",
  "symptomsChartScore": 0-100,
  "bloodChartScore": 0-100 or null,
  "normalHealthScore": 78-95,
  "normalScoreJustification": "...",
  "normalSymptomsInfo": "how a healthy person of this age feels",
  "normalBloodInfo": "normal blood values for this age and gender",
  "dataLimitations": "what was missing and how it limits the result",
  "references": [{{"title": "...", "url": "https://...", "relevance": "..."}}]
}}"#
    )
}

/// User prompt rendering everything collected by the wizard.
pub fn build_medical_user_prompt(lang: Lang, data: &MedicalAnalysisData) -> String {
    let default_profile = UserProfile::default();
    let profile = data.user_profile.as_ref().unwrap_or(&default_profile);
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".into());
    let gender = profile.gender.map(|g| g.as_str()).unwrap_or("unknown");

    let mut out = format!(
        "Patient profile:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - City: {}\n\
         - Chronic diseases: {}\n\
         - Allergies: {}\n\
         - Bad habits: {}\n\
         - Lifelong body features: {}\n",
        or_default(&profile.city, "unknown"),
        or_default(&profile.chronic_diseases, "none"),
        or_default(&profile.allergies, "none"),
        or_default(&profile.bad_habits, "none"),
        or_default(&profile.body_features, "none"),
    );

    out.push_str(&format!(
        "\nQuestionnaire answers ({} questions):\n",
        data.symptoms.len()
    ));
    for (question, answer) in data.symptoms.iter() {
        out.push_str(&format!("- {question}: {answer}\n"));
    }

    out.push_str(&format!(
        "\nPatient's own description:\n{}\n\nRecent diet:\n{}\n",
        or_default(&data.free_text, "Not provided"),
        or_default(&data.diet, "Not provided"),
    ));

    let activity = &data.activity;
    out.push_str(&format!(
        "\nActivity and lifestyle:\n- Exercise: {}\n- Sleep: {}\n- Stress: {}\n",
        or_default(&activity.exercise, "Not provided"),
        or_default(&activity.sleep, "Not provided"),
        or_default(&activity.stress, "Not provided"),
    ));
    if activity.has_heart_rate() {
        out.push_str(&format!(
            "- Resting heart rate: {} bpm\n",
            activity.heart_rate.trim()
        ));
    } else {
        out.push_str("- Resting heart rate: NOT PROVIDED (skipped)\n");
    }

    out.push_str("\nBlood test values:\n");
    match data.blood_data.as_ref().filter(|b| b.has_values()) {
        Some(panel) => out.push_str(&render_blood(panel)),
        None => out.push_str("NOT PROVIDED (skipped)\n"),
    }

    out.push_str(&format!(
        "\nPrevious analyses: {}\n",
        data.previous_analyses.len()
    ));
    out.push_str(&render_priors(&data.previous_analyses));

    out.push_str(&format!(
        "\nGive a complete cardiovascular assessment with internally consistent scores \
         and guideline references. Answer in {}.",
        lang.language_name()
    ));
    out
}

pub fn build_prescription_system_prompt(lang: Lang) -> String {
    let language = lang.language_name();
    format!(
        r#"You are a pharmacist assistant. Identify the medications described in the
prescription text and explain them. Write the whole answer in {language}.

Answer with JSON only, in a ```json fenced block:
{{
  "medications": [{{"name": "...", "dosage": "...", "purpose": "..."}}],
  "advice": "general advice about these medications"
}}"#
    )
}

pub fn build_prescription_user_prompt(text: &str) -> String {
    format!(
        "Prescription text: {}",
        or_default(text, "No text provided")
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn render_blood(panel: &BloodPanel) -> String {
    let values = [
        ("cholesterol", &panel.cholesterol),
        ("hdl", &panel.hdl),
        ("ldl", &panel.ldl),
        ("triglycerides", &panel.triglycerides),
        ("glucose", &panel.glucose),
        ("hemoglobin", &panel.hemoglobin),
    ];
    values
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(name, value)| format!("- {name}: {}\n", value.trim()))
        .collect()
}

fn render_priors(priors: &[PriorScore]) -> String {
    priors
        .iter()
        .map(|prior| {
            let blood = prior
                .blood_chart_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".into());
            format!(
                "- {}: symptoms score {}, blood score {}\n",
                prior.date.format("%Y-%m-%d"),
                prior.symptoms_chart_score,
                blood
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{Answer, Gender};
    use crate::models::{ActivityRecord, SymptomAnswers};
    use chrono::{TimeZone, Utc};

    fn sample_data() -> MedicalAnalysisData {
        MedicalAnalysisData {
            symptoms: [("q1", Answer::Yes), ("q2", Answer::No)].into_iter().collect(),
            free_text: "Chest tightness on stairs".into(),
            diet: String::new(),
            activity: ActivityRecord {
                exercise: "walks".into(),
                heart_rate: "78".into(),
                ..Default::default()
            },
            blood_data: None,
            user_profile: Some(UserProfile {
                email: "a@b.kz".into(),
                age: Some(52),
                gender: Some(Gender::Male),
                city: "Almaty".into(),
                ..Default::default()
            }),
            previous_analyses: vec![],
        }
    }

    #[test]
    fn system_prompt_names_language() {
        let prompt = build_medical_system_prompt(Lang::Kz, true, true);
        assert!(prompt.contains("Write the whole answer in Kazakh"));
        assert!(prompt.contains("\"bloodChartScore\""));
    }

    #[test]
    fn omission_rules_follow_missing_data() {
        let full = build_medical_system_prompt(Lang::En, true, true);
        assert!(!full.contains("No resting heart rate was given"));
        assert!(!full.contains("No blood test values were given"));

        let bare = build_medical_system_prompt(Lang::En, false, false);
        assert!(bare.contains("No resting heart rate was given"));
        assert!(bare.contains("No blood test values were given"));
    }

    #[test]
    fn user_prompt_renders_profile_and_answers() {
        let prompt = build_medical_user_prompt(Lang::Ru, &sample_data());
        assert!(prompt.contains("- Age: 52"));
        assert!(prompt.contains("- Gender: male"));
        assert!(prompt.contains("- City: Almaty"));
        assert!(prompt.contains("- Allergies: none"));
        assert!(prompt.contains("- q1: yes"));
        assert!(prompt.contains("Chest tightness on stairs"));
        assert!(prompt.contains("Recent diet:\nNot provided"));
        assert!(prompt.contains("- Resting heart rate: 78 bpm"));
        assert!(prompt.contains("Blood test values:\nNOT PROVIDED"));
        assert!(prompt.contains("Answer in Russian."));
    }

    #[test]
    fn user_prompt_without_profile_uses_unknowns() {
        let data = MedicalAnalysisData {
            symptoms: SymptomAnswers::new(),
            ..Default::default()
        };
        let prompt = build_medical_user_prompt(Lang::En, &data);
        assert!(prompt.contains("- Age: unknown"));
        assert!(prompt.contains("- Resting heart rate: NOT PROVIDED"));
        assert!(prompt.contains("Previous analyses: 0"));
    }

    #[test]
    fn user_prompt_lists_blood_and_priors() {
        let mut data = sample_data();
        let mut panel = BloodPanel::default();
        panel.set("ldl", "3.4");
        data.blood_data = Some(panel);
        data.previous_analyses = vec![PriorScore {
            date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            symptoms_chart_score: 70,
            blood_chart_score: None,
        }];

        let prompt = build_medical_user_prompt(Lang::En, &data);
        assert!(prompt.contains("- ldl: 3.4"));
        assert!(!prompt.contains("- hdl:"));
        assert!(prompt.contains("Previous analyses: 1"));
        assert!(prompt.contains("2026-03-01: symptoms score 70, blood score none"));
    }

    #[test]
    fn prescription_prompts() {
        assert!(build_prescription_system_prompt(Lang::En).contains("\"medications\""));
        assert_eq!(
            build_prescription_user_prompt("  "),
            "Prescription text: No text provided"
        );
    }
}
