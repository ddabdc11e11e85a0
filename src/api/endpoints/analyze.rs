//! The analysis function over HTTP.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::analysis::{AnalysisRequest, SOURCE_HEADER};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `POST /analyze` — body `{type, lang, data}`.
///
/// Success carries the assessment (or prescription result) with an
/// `X-Analysis-Source` header. Failures use the `{error}` body with
/// 429, 402 or 500; an unreadable body is a 500 like any other failure.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let message = rejection.body_text();
        tracing::error!(error = %message, "Analysis request rejected");
        ApiError::Internal(message)
    })?;
    tracing::info!(
        kind = request.payload.type_tag(),
        lang = request.lang.as_str(),
        "Analysis requested"
    );

    let service = ctx.analysis.clone();
    let outcome = tokio::task::spawn_blocking(move || service.handle(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))?;

    let (reply, source) = outcome.into_result()?;
    let mut response = Json(reply).into_response();
    response
        .headers_mut()
        .insert(SOURCE_HEADER, HeaderValue::from_static(source.as_str()));
    Ok(response)
}
