use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::wizard::WizardSession;

/// A completed wizard walk as stored for the history command
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: i64,
    pub chat_id: i64,
    pub product_url: String,
    pub gender: String,
    pub category: String,
    pub unit: String,
    /// JSON object, dimension name → raw value string
    pub measurements: String,
    pub recommended_size: String,
    /// Filled by the database default, always UTC
    pub created_at: DateTime<Utc>,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id INTEGER NOT NULL,
            product_url TEXT NOT NULL,
            gender TEXT NOT NULL,
            category TEXT NOT NULL,
            unit TEXT NOT NULL,
            measurements TEXT NOT NULL,
            recommended_size TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create sessions table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_chat_id ON sessions (chat_id)")
        .execute(pool)
        .await
        .context("Failed to create sessions chat index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Persist a finished wizard walk for a chat
///
/// Only sessions that reached the results screen qualify; anything without
/// a classification or a recommendation is refused.
pub async fn save_completed_session(
    pool: &SqlitePool,
    chat_id: i64,
    session: &WizardSession,
) -> Result<i64> {
    let gender = session
        .gender
        .ok_or_else(|| anyhow::anyhow!("Cannot save a session without a detected gender"))?;
    let category = session
        .category
        .ok_or_else(|| anyhow::anyhow!("Cannot save a session without a detected category"))?;
    let recommended = session
        .recommended_size
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Cannot save a session without a recommendation"))?;
    let measurements = serde_json::to_string(&session.measurements)
        .context("Failed to serialize session measurements")?;

    let result = sqlx::query(
        "INSERT INTO sessions (chat_id, product_url, gender, category, unit, measurements, recommended_size)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(chat_id)
    .bind(&session.product_url)
    .bind(gender.as_str())
    .bind(category.as_str())
    .bind(session.unit.as_str())
    .bind(&measurements)
    .bind(recommended)
    .execute(pool)
    .await
    .context("Failed to insert completed session")?;

    let session_id = result.last_insert_rowid();
    debug!(chat_id = chat_id, session_id = session_id, "Saved completed session");
    Ok(session_id)
}

/// Read the most recent completed sessions for a chat, newest first
pub async fn recent_sessions(
    pool: &SqlitePool,
    chat_id: i64,
    limit: i64,
) -> Result<Vec<SessionRecord>> {
    let rows = sqlx::query(
        "SELECT id, chat_id, product_url, gender, category, unit, measurements, recommended_size, created_at
         FROM sessions
         WHERE chat_id = ?
         ORDER BY id DESC
         LIMIT ?",
    )
    .bind(chat_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to read recent sessions")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(SessionRecord {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            product_url: row.try_get("product_url")?,
            gender: row.try_get("gender")?,
            category: row.try_get("category")?,
            unit: row.try_get("unit")?,
            measurements: row.try_get("measurements")?,
            recommended_size: row.try_get("recommended_size")?,
            created_at: row.try_get("created_at")?,
        });
    }

    debug!(chat_id = chat_id, count = records.len(), "Loaded recent sessions");
    Ok(records)
}
