use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::FeedbackEntry;

pub fn insert_feedback(conn: &Connection, entry: &FeedbackEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO feedback (id, user_name, user_email, message, likes_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id.to_string(),
            entry.user_name,
            entry.user_email,
            entry.message,
            entry.likes_count,
            entry.created_at,
        ],
    )?;
    Ok(())
}

/// All entries, most liked first; ties go to the newest.
pub fn list_feedback(conn: &Connection) -> Result<Vec<FeedbackEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_name, user_email, message, likes_count, created_at
         FROM feedback ORDER BY likes_count DESC, created_at DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, NaiveDateTime>(5)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(feedback_from_row(row?)?);
    }
    Ok(entries)
}

pub fn get_feedback(conn: &Connection, id: &Uuid) -> Result<Option<FeedbackEntry>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, user_name, user_email, message, likes_count, created_at
             FROM feedback WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, NaiveDateTime>(5)?,
                ))
            },
        )
        .optional()?;

    row.map(feedback_from_row).transpose()
}

type FeedbackRow = (String, String, String, String, i64, NaiveDateTime);

fn feedback_from_row(row: FeedbackRow) -> Result<FeedbackEntry, DatabaseError> {
    let (id, user_name, user_email, message, likes_count, created_at) = row;
    let id = Uuid::from_str(&id).map_err(|_| DatabaseError::InvalidEnum {
        field: "feedback.id".into(),
        value: id.clone(),
    })?;
    Ok(FeedbackEntry {
        id,
        user_name,
        user_email,
        message,
        likes_count,
        created_at,
    })
}

/// Record a like. Returns false when this email already liked the entry.
pub fn insert_like(
    conn: &Connection,
    feedback_id: &Uuid,
    user_email: &str,
) -> Result<bool, DatabaseError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO feedback_likes (feedback_id, user_email) VALUES (?1, ?2)",
        params![feedback_id.to_string(), user_email],
    )?;
    Ok(inserted == 1)
}

/// Remove a like. Returns false when there was none.
pub fn delete_like(
    conn: &Connection,
    feedback_id: &Uuid,
    user_email: &str,
) -> Result<bool, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM feedback_likes WHERE feedback_id = ?1 AND user_email = ?2",
        params![feedback_id.to_string(), user_email],
    )?;
    Ok(deleted == 1)
}

pub fn has_liked(
    conn: &Connection,
    feedback_id: &Uuid,
    user_email: &str,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM feedback_likes WHERE feedback_id = ?1 AND user_email = ?2",
        params![feedback_id.to_string(), user_email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Ids of every entry the given email has liked.
pub fn liked_feedback_ids(conn: &Connection, user_email: &str) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT feedback_id FROM feedback_likes WHERE user_email = ?1")?;
    let rows = stmt.query_map(params![user_email], |row| row.get::<_, String>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        let raw = row?;
        let id = Uuid::from_str(&raw).map_err(|_| DatabaseError::InvalidEnum {
            field: "feedback_likes.feedback_id".into(),
            value: raw.clone(),
        })?;
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::Utc;

    fn entry(message: &str) -> FeedbackEntry {
        FeedbackEntry {
            id: Uuid::new_v4(),
            user_name: "Dana".into(),
            user_email: "dana@example.kz".into(),
            message: message.into(),
            likes_count: 0,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn insert_and_get() {
        let conn = open_memory_database().unwrap();
        let e = entry("Very helpful");
        insert_feedback(&conn, &e).unwrap();

        let fetched = get_feedback(&conn, &e.id).unwrap().unwrap();
        assert_eq!(fetched.message, "Very helpful");
        assert_eq!(fetched.likes_count, 0);
        assert!(get_feedback(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn likes_update_count_through_triggers() {
        let conn = open_memory_database().unwrap();
        let e = entry("Great");
        insert_feedback(&conn, &e).unwrap();

        assert!(insert_like(&conn, &e.id, "a@x.kz").unwrap());
        assert!(!insert_like(&conn, &e.id, "a@x.kz").unwrap());
        assert!(insert_like(&conn, &e.id, "b@x.kz").unwrap());
        assert_eq!(get_feedback(&conn, &e.id).unwrap().unwrap().likes_count, 2);

        assert!(delete_like(&conn, &e.id, "a@x.kz").unwrap());
        assert!(!delete_like(&conn, &e.id, "a@x.kz").unwrap());
        assert_eq!(get_feedback(&conn, &e.id).unwrap().unwrap().likes_count, 1);
        assert!(has_liked(&conn, &e.id, "b@x.kz").unwrap());
        assert!(!has_liked(&conn, &e.id, "a@x.kz").unwrap());
    }

    #[test]
    fn list_orders_by_likes() {
        let conn = open_memory_database().unwrap();
        let quiet = entry("quiet");
        let popular = entry("popular");
        insert_feedback(&conn, &quiet).unwrap();
        insert_feedback(&conn, &popular).unwrap();
        insert_like(&conn, &popular.id, "a@x.kz").unwrap();

        let list = list_feedback(&conn).unwrap();
        assert_eq!(list[0].id, popular.id);
        assert_eq!(list[1].id, quiet.id);
    }

    #[test]
    fn liked_ids_per_email() {
        let conn = open_memory_database().unwrap();
        let one = entry("one");
        let two = entry("two");
        insert_feedback(&conn, &one).unwrap();
        insert_feedback(&conn, &two).unwrap();
        insert_like(&conn, &two.id, "a@x.kz").unwrap();

        assert_eq!(liked_feedback_ids(&conn, "a@x.kz").unwrap(), vec![two.id]);
        assert!(liked_feedback_ids(&conn, "nobody@x.kz").unwrap().is_empty());
    }

    #[test]
    fn like_on_missing_feedback_is_rejected() {
        let conn = open_memory_database().unwrap();
        assert!(insert_like(&conn, &Uuid::new_v4(), "a@x.kz").is_err());
    }
}
