//! SQLite User Config Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, parse_time, parse_uuid, DbPool};
use crate::application::ports::{RepositoryError, UserConfigRecord, UserConfigRepositoryPort};
use crate::domain::UserPreferences;

/// SQLite User Config Repository
pub struct SqliteUserConfigRepository {
    pool: DbPool,
}

impl SqliteUserConfigRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserConfigRow {
    user_id: String,
    binaural_base_freq: i64,
    binaural_beat_freq: i64,
    binaural_volume: f64,
    voice_volume: f64,
    gap_between_sec: i64,
    updated_at: String,
}

impl TryFrom<UserConfigRow> for UserConfigRecord {
    type Error = RepositoryError;

    fn try_from(row: UserConfigRow) -> Result<Self, Self::Error> {
        Ok(UserConfigRecord {
            user_id: parse_uuid(&row.user_id)?,
            preferences: UserPreferences {
                binaural_base_freq: row.binaural_base_freq,
                binaural_beat_freq: row.binaural_beat_freq,
                binaural_volume: row.binaural_volume,
                voice_volume: row.voice_volume,
                gap_between_sec: row.gap_between_sec,
            },
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl UserConfigRepositoryPort for SqliteUserConfigRepository {
    async fn find_or_create(&self, user_id: Uuid) -> Result<UserConfigRecord, RepositoryError> {
        let defaults = UserPreferences::default();

        sqlx::query(
            r#"
            INSERT INTO user_configs
                (user_id, binaural_base_freq, binaural_beat_freq, binaural_volume, voice_volume, gap_between_sec, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(user_id.to_string())
        .bind(defaults.binaural_base_freq)
        .bind(defaults.binaural_beat_freq)
        .bind(defaults.binaural_volume)
        .bind(defaults.voice_volume)
        .bind(defaults.gap_between_sec)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let row: UserConfigRow = sqlx::query_as(
            r#"
            SELECT user_id, binaural_base_freq, binaural_beat_freq, binaural_volume,
                   voice_volume, gap_between_sec, updated_at
            FROM user_configs WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        UserConfigRecord::try_from(row)
    }

    async fn save(&self, record: &UserConfigRecord) -> Result<(), RepositoryError> {
        let prefs = &record.preferences;

        sqlx::query(
            r#"
            INSERT INTO user_configs
                (user_id, binaural_base_freq, binaural_beat_freq, binaural_volume, voice_volume, gap_between_sec, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                binaural_base_freq = excluded.binaural_base_freq,
                binaural_beat_freq = excluded.binaural_beat_freq,
                binaural_volume = excluded.binaural_volume,
                voice_volume = excluded.voice_volume,
                gap_between_sec = excluded.gap_between_sec,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.user_id.to_string())
        .bind(prefs.binaural_base_freq)
        .bind(prefs.binaural_beat_freq)
        .bind(prefs.binaural_volume)
        .bind(prefs.voice_volume)
        .bind(prefs.gap_between_sec)
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
