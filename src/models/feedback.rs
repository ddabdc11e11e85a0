use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub message: String,
    pub likes_count: i64,
    pub created_at: NaiveDateTime,
}

/// Input for posting a new feedback message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub user_name: String,
    pub user_email: String,
    pub message: String,
}

impl NewFeedback {
    /// Feedback signed with the given profile's display name and email.
    pub fn from_profile(profile: &super::UserProfile, message: impl Into<String>) -> Self {
        Self {
            user_name: profile.display_name().to_string(),
            user_email: profile.email.clone(),
            message: message.into(),
        }
    }
}
