//! Client-side submission flow.
//!
//! Drives a finished wizard through the analysis backend into the local
//! history. Every submission ends with exactly one appended record: model
//! output, the fixed fallback, or, when the backend cannot be reached at
//! all, a record built from the local symptom score.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::analysis::{
    AnalysisOutcome, AnalysisRequest, AnalysisService, FailureKind, MedicalAnalysisData,
    PrescriptionData, PriorScore, SOURCE_HEADER,
};
use crate::i18n::{self, Lang};
use crate::models::enums::AnalysisSource;
use crate::models::{
    AnalysisRecord, Assessment, PrescribedMedication, PrescriptionResult, DEFAULT_NORMAL_SCORE,
};
use crate::session::{KeyValueStore, SessionContext, SessionError};
use crate::wizard::{score_symptoms, Submission};

// ═══════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════

/// UI destinations a flow can hand back to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Analysis,
    Hospitals,
    Auth,
    Chart,
    About,
    Medicine,
    Feedback,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Analysis => "/analysis",
            Self::Hospitals => "/hospitals",
            Self::Auth => "/auth",
            Self::Chart => "/chart",
            Self::About => "/about",
            Self::Medicine => "/medicine",
            Self::Feedback => "/feedback",
            Self::NotFound => "*",
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Self::Home,
            "/analysis" => Self::Analysis,
            "/hospitals" => Self::Hospitals,
            "/auth" => Self::Auth,
            "/chart" => Self::Chart,
            "/about" => Self::About,
            "/medicine" => Self::Medicine,
            "/feedback" => Self::Feedback,
            _ => Self::NotFound,
        }
    }

    /// Pages that redirect to `Auth` without a signed-in user.
    pub fn requires_user(&self) -> bool {
        matches!(self, Self::Analysis | Self::Chart | Self::Medicine)
    }
}

// ═══════════════════════════════════════════════════════════
// Backends
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Analysis service unreachable: {0}")]
    Transport(String),
    #[error("Analysis service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected analysis response: {0}")]
    Decode(String),
}

/// Where the client sends its analysis requests.
pub trait AnalysisBackend {
    fn assess(
        &self,
        lang: Lang,
        data: &MedicalAnalysisData,
    ) -> Result<(Assessment, AnalysisSource), BackendError>;

    fn prescribe(&self, lang: Lang, text: &str) -> Result<PrescriptionResult, BackendError>;
}

/// Calls the analysis service directly, without HTTP.
pub struct InProcessBackend {
    service: AnalysisService,
}

impl InProcessBackend {
    pub fn new(service: AnalysisService) -> Self {
        Self { service }
    }
}

fn failure_status(kind: FailureKind) -> u16 {
    match kind {
        FailureKind::RateLimited => 429,
        FailureKind::PaymentRequired => 402,
        FailureKind::Internal => 500,
    }
}

fn outcome_into_result<T>(outcome: AnalysisOutcome<T>) -> Result<(T, AnalysisSource), BackendError> {
    outcome
        .into_result()
        .map_err(|f| BackendError::Rejected {
            status: failure_status(f.kind),
            message: f.message,
        })
}

impl AnalysisBackend for InProcessBackend {
    fn assess(
        &self,
        lang: Lang,
        data: &MedicalAnalysisData,
    ) -> Result<(Assessment, AnalysisSource), BackendError> {
        outcome_into_result(self.service.analyze_medical(lang, data))
    }

    fn prescribe(&self, lang: Lang, text: &str) -> Result<PrescriptionResult, BackendError> {
        let data = PrescriptionData {
            prescription_text: text.to_string(),
        };
        outcome_into_result(self.service.prescribe(lang, &data)).map(|(r, _)| r)
    }
}

impl<B: AnalysisBackend + ?Sized> AnalysisBackend for Arc<B> {
    fn assess(
        &self,
        lang: Lang,
        data: &MedicalAnalysisData,
    ) -> Result<(Assessment, AnalysisSource), BackendError> {
        (**self).assess(lang, data)
    }

    fn prescribe(&self, lang: Lang, text: &str) -> Result<PrescriptionResult, BackendError> {
        (**self).prescribe(lang, text)
    }
}

/// Calls a running analysis server over HTTP (`POST {base}/analyze`).
///
/// Blocking; from async code wrap calls in `spawn_blocking`.
pub struct HttpBackend {
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn post(&self, request: &AnalysisRequest) -> Result<reqwest::blocking::Response, BackendError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let response = client
            .post(format!("{}/analyze", self.base_url))
            .json(request)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

impl AnalysisBackend for HttpBackend {
    fn assess(
        &self,
        lang: Lang,
        data: &MedicalAnalysisData,
    ) -> Result<(Assessment, AnalysisSource), BackendError> {
        let response = self.post(&AnalysisRequest::medical(lang, data.clone()))?;
        let source = response
            .headers()
            .get(SOURCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| AnalysisSource::from_str(v).ok())
            .unwrap_or(AnalysisSource::Model);
        let assessment = response
            .json::<Assessment>()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok((assessment, source))
    }

    fn prescribe(&self, lang: Lang, text: &str) -> Result<PrescriptionResult, BackendError> {
        self.post(&AnalysisRequest::prescription(lang, text))?
            .json::<PrescriptionResult>()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════
// Flows
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Prescription text is empty")]
    EmptyPrescription,
}

/// Result of a finished submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub route: Route,
    pub record: AnalysisRecord,
    pub history_len: usize,
    /// False when the record came from the local symptom score.
    pub remote: bool,
}

/// Runs wizard submissions and prescription lookups, one at a time.
///
/// `submit` and `prescribe` take `&mut self`, so a second call cannot start
/// while one is in flight. Each call blocks until it has a result.
pub struct SubmissionFlow<B: AnalysisBackend> {
    backend: B,
    lang: Lang,
}

impl<B: AnalysisBackend> SubmissionFlow<B> {
    pub fn new(backend: B, lang: Lang) -> Self {
        Self { backend, lang }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Lang) {
        self.lang = lang;
    }

    /// Analyze a frozen wizard draft and append the result to history.
    ///
    /// Backend failures never surface here; they produce a local record.
    /// Only session store errors are returned.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        session: &SessionContext<S>,
        submission: Submission,
    ) -> Result<SubmissionReceipt, FlowError> {
        let profile = session.require_user()?.clone();
        let history = session.history()?;

        let data = MedicalAnalysisData {
            symptoms: submission.symptoms.clone(),
            free_text: submission.free_text.clone(),
            diet: submission.diet.clone(),
            activity: submission.activity.clone(),
            blood_data: submission.blood.clone(),
            user_profile: Some(profile),
            previous_analyses: history.iter().map(PriorScore::from).collect(),
        };

        let (mut assessment, source, remote) = match self.backend.assess(self.lang, &data) {
            Ok((assessment, source)) => (assessment, source, true),
            Err(e) => {
                tracing::warn!(error = %e, "Remote analysis failed, using local symptom score");
                (
                    local_assessment(self.lang, &data),
                    AnalysisSource::Fallback,
                    false,
                )
            }
        };
        if !data.has_blood_data() {
            assessment.blood_chart_score = None;
        }

        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            date: Utc::now(),
            source,
            assessment,
            symptoms_raw: submission.symptoms,
            free_text: submission.free_text,
            diet: submission.diet,
            activity: submission.activity,
            blood_data_raw: submission.blood,
            uploaded_file: submission.uploaded_file,
        };
        let history_len = session.append_record(record.clone())?;
        tracing::info!(
            history_len,
            source = %record.source,
            risk_score = record.risk_score(),
            "Analysis stored"
        );

        Ok(SubmissionReceipt {
            route: Route::Chart,
            record,
            history_len,
            remote,
        })
    }

    /// Identify medications in a prescription description.
    ///
    /// Empty text is rejected before any call. A failed call yields a
    /// placeholder naming the input text.
    pub fn prescribe<S: KeyValueStore>(
        &mut self,
        session: &SessionContext<S>,
        text: &str,
    ) -> Result<PrescriptionResult, FlowError> {
        session.require_user()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(FlowError::EmptyPrescription);
        }

        Ok(self.backend.prescribe(self.lang, text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Prescription lookup failed, using placeholder");
            local_prescription(self.lang, text)
        }))
    }
}

/// Assessment built from the questionnaire alone, with localized wording.
pub fn local_assessment(lang: Lang, data: &MedicalAnalysisData) -> Assessment {
    let score = score_symptoms(&data.symptoms);
    let (verdict, measures) = i18n::local_verdict(lang, score.category);
    Assessment {
        verdict,
        risk_score: score.risk_score,
        risk_category: score.category,
        short_term_measures: measures,
        symptoms_chart_score: score.chart_score,
        blood_chart_score: None,
        needs_hospital: false,
        normal_health_score: DEFAULT_NORMAL_SCORE,
        ..Assessment::default()
    }
}

pub fn local_prescription(lang: Lang, text: &str) -> PrescriptionResult {
    PrescriptionResult {
        medications: vec![PrescribedMedication {
            name: text.to_string(),
            purpose: i18n::t(lang, "medicine.fallback.purpose").to_string(),
            ..PrescribedMedication::default()
        }],
        advice: i18n::t(lang, "medicine.fallback.advice").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockLlmClient;
    use crate::models::enums::{Answer, RiskCategory};
    use crate::models::intake::QUESTION_KEYS;
    use crate::models::UserProfile;
    use crate::session::MemoryStore;
    use crate::wizard::Wizard;

    /// Backend that always fails to connect.
    struct DownBackend;

    impl AnalysisBackend for DownBackend {
        fn assess(
            &self,
            _lang: Lang,
            _data: &MedicalAnalysisData,
        ) -> Result<(Assessment, AnalysisSource), BackendError> {
            Err(BackendError::Transport("connection refused".into()))
        }

        fn prescribe(&self, _lang: Lang, _text: &str) -> Result<PrescriptionResult, BackendError> {
            Err(BackendError::Transport("connection refused".into()))
        }
    }

    fn signed_in() -> SessionContext<MemoryStore> {
        let mut session = SessionContext::new(MemoryStore::new());
        session
            .register(UserProfile {
                email: "aigerim@example.kz".into(),
                full_name: "Aigerim".into(),
                age: Some(45),
                ..Default::default()
            })
            .unwrap();
        session
    }

    fn example_submission(skip_blood: bool) -> Submission {
        let mut wizard = Wizard::new();
        for q in QUESTION_KEYS {
            wizard.answer(q, Answer::No);
        }
        wizard.answer("q1", Answer::Yes);
        wizard.answer("q3", Answer::Sometimes);
        for _ in 0..4 {
            wizard.next().unwrap();
        }
        wizard.set_blood_value("ldl", "4.1");
        wizard.submit(skip_blood).unwrap()
    }

    fn in_process(reply: &str) -> InProcessBackend {
        InProcessBackend::new(AnalysisService::new(Arc::new(MockLlmClient::new(reply))))
    }

    #[test]
    fn backend_failure_appends_local_record() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(DownBackend, Lang::En);

        let receipt = flow.submit(&session, example_submission(true)).unwrap();

        assert_eq!(receipt.route, Route::Chart);
        assert!(!receipt.remote);
        assert_eq!(receipt.history_len, 1);
        assert_eq!(session.history().unwrap().len(), 1);

        let a = &receipt.record.assessment;
        assert_eq!(a.risk_score, 15);
        assert_eq!(a.symptoms_chart_score, 85);
        assert_eq!(a.risk_category, RiskCategory::Low);
        assert_eq!(a.blood_chart_score, None);
        assert!(!a.needs_hospital);
        assert_eq!(a.verdict, i18n::t(Lang::En, "results.level.low.verdict"));
        assert_eq!(receipt.record.source, AnalysisSource::Fallback);
    }

    #[test]
    fn skipped_blood_stores_null_blood() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(in_process(r#"{"bloodChartScore": 61}"#), Lang::Ru);

        let receipt = flow.submit(&session, example_submission(true)).unwrap();
        assert!(receipt.remote);
        assert_eq!(receipt.record.blood_data_raw, None);
        assert_eq!(receipt.record.blood_chart_score(), None);
    }

    #[test]
    fn provided_blood_is_kept() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(in_process(r#"{"bloodChartScore": 61}"#), Lang::Ru);

        let receipt = flow.submit(&session, example_submission(false)).unwrap();
        assert_eq!(receipt.record.blood_data_raw.as_ref().unwrap().ldl, "4.1");
        assert_eq!(receipt.record.blood_chart_score(), Some(61));
    }

    #[test]
    fn malformed_reply_is_stored_as_fallback() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(in_process("not json at all"), Lang::En);

        let receipt = flow.submit(&session, example_submission(true)).unwrap();
        assert!(receipt.remote);
        assert_eq!(receipt.record.source, AnalysisSource::Fallback);
        assert_eq!(receipt.record.risk_score(), 50);
        assert_eq!(receipt.record.assessment.verdict, "not json at all");
    }

    #[test]
    fn rate_limit_falls_back_locally() {
        let session = signed_in();
        let backend =
            InProcessBackend::new(AnalysisService::new(Arc::new(MockLlmClient::failing_status(429, ""))));
        let mut flow = SubmissionFlow::new(backend, Lang::Kz);

        let receipt = flow.submit(&session, example_submission(true)).unwrap();
        assert!(!receipt.remote);
        assert_eq!(receipt.record.symptoms_chart_score(), 85);
    }

    #[test]
    fn previous_scores_are_sent_with_next_submission() {
        let session = signed_in();
        let mock = Arc::new(MockLlmClient::new(r#"{"symptomsChartScore": 77}"#));
        let backend = InProcessBackend::new(AnalysisService::new(mock.clone()));
        let mut flow = SubmissionFlow::new(backend, Lang::En);

        flow.submit(&session, example_submission(true)).unwrap();
        flow.submit(&session, example_submission(true)).unwrap();

        let calls = mock.calls();
        assert!(calls[0].1.contains("Previous analyses: 0"));
        assert!(calls[1].1.contains("Previous analyses: 1"));
        assert!(calls[1].1.contains("symptoms score 77"));
    }

    #[test]
    fn submit_requires_signed_in_user() {
        let session = SessionContext::new(MemoryStore::new());
        let mut flow = SubmissionFlow::new(DownBackend, Lang::En);
        let err = flow.submit(&session, example_submission(true)).unwrap_err();
        assert!(matches!(err, FlowError::Session(SessionError::NotAuthenticated)));
    }

    #[test]
    fn empty_prescription_is_rejected() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(DownBackend, Lang::En);
        assert!(matches!(
            flow.prescribe(&session, "   "),
            Err(FlowError::EmptyPrescription)
        ));
    }

    #[test]
    fn failed_prescription_uses_placeholder() {
        let session = signed_in();
        let mut flow = SubmissionFlow::new(DownBackend, Lang::Ru);
        let result = flow.prescribe(&session, "Конкор 5 мг").unwrap();
        assert_eq!(result.medications.len(), 1);
        assert_eq!(result.medications[0].name, "Конкор 5 мг");
        assert_eq!(result.medications[0].dosage, "—");
        assert_eq!(result.medications[0].purpose, "Не удалось определить");
        assert_eq!(result.advice, "Обратитесь к фармацевту для уточнения.");
    }

    #[test]
    fn routes_round_trip_paths() {
        for route in [Route::Home, Route::Analysis, Route::Chart, Route::Feedback] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert!(Route::Medicine.requires_user());
        assert!(!Route::Hospitals.requires_user());
    }
}
