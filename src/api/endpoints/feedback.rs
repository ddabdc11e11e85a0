//! Feedback board endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::feedback::{BoardSnapshot, LikeState};
use crate::models::{FeedbackEntry, NewFeedback};

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
pub struct LikesQuery {
    #[serde(default)]
    pub user_email: String,
}

#[derive(Debug, Serialize)]
pub struct LikedIds {
    pub liked_ids: Vec<Uuid>,
}

/// `GET /feedback` — entries by likes, plus the average.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<BoardSnapshot>, ApiError> {
    Ok(Json(ctx.feedback.snapshot()?))
}

/// `POST /feedback`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewFeedback>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackEntry>), ApiError> {
    let Json(input) = payload?;
    let entry = ctx.feedback.submit(input)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /feedback/:id/like` — toggles the caller's like.
pub async fn toggle_like(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<Json<LikeState>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid feedback ID".into()))?;
    let Json(body) = payload?;
    Ok(Json(ctx.feedback.toggle_like(&id, &body.user_email)?))
}

/// `GET /feedback/likes?user_email=`
pub async fn liked(
    State(ctx): State<ApiContext>,
    Query(query): Query<LikesQuery>,
) -> Result<Json<LikedIds>, ApiError> {
    if query.user_email.trim().is_empty() {
        return Ok(Json(LikedIds { liked_ids: vec![] }));
    }
    Ok(Json(LikedIds {
        liked_ids: ctx.feedback.liked_ids(&query.user_email)?,
    }))
}
