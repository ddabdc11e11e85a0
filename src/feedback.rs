//! Feedback board: messages from signed-in users and per-user likes.

use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{FeedbackEntry, NewFeedback};

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Feedback message is empty")]
    EmptyMessage,
    #[error("A signed-in email is required")]
    MissingEmail,
    #[error("Feedback {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Internal lock error")]
    LockPoisoned,
}

impl From<rusqlite::Error> for FeedbackError {
    fn from(err: rusqlite::Error) -> Self {
        FeedbackError::Database(err.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub entries: Vec<FeedbackEntry>,
    /// Mean likes per entry, one decimal.
    pub average_likes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: i64,
}

/// Mean likes per entry rounded to one decimal; 0 for an empty board.
pub fn average_likes(entries: &[FeedbackEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: i64 = entries.iter().map(|e| e.likes_count).sum();
    let mean = total as f64 / entries.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// SQLite-backed board. Access is serialized through one connection.
pub struct FeedbackBoard {
    conn: Mutex<Connection>,
}

impl FeedbackBoard {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn in_memory() -> Result<Self, FeedbackError> {
        Ok(Self::new(db::open_memory_database()?))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, FeedbackError> {
        self.conn.lock().map_err(|_| FeedbackError::LockPoisoned)
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot, FeedbackError> {
        let conn = self.lock()?;
        let entries = db::list_feedback(&conn)?;
        Ok(BoardSnapshot {
            average_likes: average_likes(&entries),
            entries,
        })
    }

    /// Post a message. The text is trimmed; the display name falls back to
    /// the email when blank.
    pub fn submit(&self, input: NewFeedback) -> Result<FeedbackEntry, FeedbackError> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(FeedbackError::EmptyMessage);
        }
        let email = input.user_email.trim();
        if email.is_empty() {
            return Err(FeedbackError::MissingEmail);
        }
        let user_name = match input.user_name.trim() {
            "" => email,
            name => name,
        };

        let entry = FeedbackEntry {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            user_email: email.to_string(),
            message: message.to_string(),
            likes_count: 0,
            created_at: Utc::now().naive_utc(),
        };
        db::insert_feedback(&*self.lock()?, &entry)?;
        tracing::info!(id = %entry.id, "Feedback posted");
        Ok(entry)
    }

    /// Like the entry, or remove the like if this email already gave one.
    pub fn toggle_like(&self, feedback_id: &Uuid, user_email: &str) -> Result<LikeState, FeedbackError> {
        let email = user_email.trim();
        if email.is_empty() {
            return Err(FeedbackError::MissingEmail);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if db::get_feedback(&tx, feedback_id)?.is_none() {
            return Err(FeedbackError::NotFound(*feedback_id));
        }
        let liked = if db::has_liked(&tx, feedback_id, email)? {
            db::delete_like(&tx, feedback_id, email)?;
            false
        } else {
            db::insert_like(&tx, feedback_id, email)?;
            true
        };
        let likes_count = db::get_feedback(&tx, feedback_id)?
            .map(|e| e.likes_count)
            .ok_or(FeedbackError::NotFound(*feedback_id))?;
        tx.commit()?;

        Ok(LikeState { liked, likes_count })
    }

    pub fn liked_ids(&self, user_email: &str) -> Result<Vec<Uuid>, FeedbackError> {
        Ok(db::liked_feedback_ids(&*self.lock()?, user_email.trim())?)
    }
}
