use std::sync::Arc;

use super::parser::{parse_assessment, parse_prescription};
use super::prompt::{
    build_medical_system_prompt, build_medical_user_prompt, build_prescription_system_prompt,
    build_prescription_user_prompt,
};
use super::types::{
    AnalysisFailure, AnalysisOutcome, AnalysisPayload, AnalysisReply, AnalysisRequest, LlmClient,
    MedicalAnalysisData, PrescriptionData,
};
use super::GatewayError;
use crate::i18n::Lang;
use crate::models::{Assessment, PrescriptionResult};

/// The analysis function: prompt, call, normalize.
///
/// Blocking. Run it on `spawn_blocking` from async code.
#[derive(Clone)]
pub struct AnalysisService {
    client: Arc<dyn LlmClient + Send + Sync>,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub fn handle(&self, request: &AnalysisRequest) -> AnalysisOutcome<AnalysisReply> {
        match &request.payload {
            AnalysisPayload::MedicalAnalysis(data) => self
                .analyze_medical(request.lang, data)
                .map(|a| AnalysisReply::Assessment(Box::new(a))),
            AnalysisPayload::Prescription(data) => self
                .prescribe(request.lang, data)
                .map(AnalysisReply::Prescription),
        }
    }

    pub fn analyze_medical(
        &self,
        lang: Lang,
        data: &MedicalAnalysisData,
    ) -> AnalysisOutcome<Assessment> {
        let has_blood = data.has_blood_data();
        let system = build_medical_system_prompt(lang, data.has_heart_rate(), has_blood);
        let user = build_medical_user_prompt(lang, data);

        let reply = match self.client.complete(&system, &user) {
            Ok(reply) => reply,
            Err(e) => return AnalysisOutcome::Error(log_failure(e)),
        };

        match parse_assessment(&reply) {
            Ok(mut assessment) => {
                if !has_blood {
                    assessment.blood_chart_score = None;
                }
                tracing::info!(
                    risk_score = assessment.risk_score,
                    category = %assessment.risk_category,
                    "Assessment parsed from model reply"
                );
                AnalysisOutcome::Model(assessment)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model reply unparseable, substituting fallback assessment");
                AnalysisOutcome::Fallback(Assessment::fallback(reply))
            }
        }
    }

    pub fn prescribe(
        &self,
        lang: Lang,
        data: &PrescriptionData,
    ) -> AnalysisOutcome<PrescriptionResult> {
        let system = build_prescription_system_prompt(lang);
        let user = build_prescription_user_prompt(&data.prescription_text);

        let reply = match self.client.complete(&system, &user) {
            Ok(reply) => reply,
            Err(e) => return AnalysisOutcome::Error(log_failure(e)),
        };

        match parse_prescription(&reply) {
            Ok(result) => AnalysisOutcome::Model(result),
            Err(e) => {
                tracing::warn!(error = %e, "Prescription reply unparseable, returning it as advice");
                AnalysisOutcome::Fallback(PrescriptionResult {
                    medications: Vec::new(),
                    advice: reply,
                })
            }
        }
    }
}

fn log_failure(err: GatewayError) -> AnalysisFailure {
    match &err {
        GatewayError::Status { status, body } => {
            tracing::error!(status, body = %body, "AI gateway error");
        }
        other => tracing::error!(error = %other, "Analysis call failed"),
    }
    AnalysisFailure::from(err)
}
