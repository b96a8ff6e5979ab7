//! Persisted record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored player, one row per player identity
///
/// Field names differ from the stored column names, which are kept for
/// compatibility with existing `recommendations` databases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recommendation {
    pub player_id: i64,
    #[sqlx(rename = "apelido")]
    pub nickname: String,
    #[sqlx(rename = "clube_id")]
    pub club_id: i64,
    /// Empty when the club has no mapped badge
    #[sqlx(rename = "escudo_url")]
    pub badge_url: String,
    #[sqlx(rename = "foto_url")]
    pub photo_url: String,
    #[sqlx(rename = "posicao_id")]
    pub position_id: i64,
    #[sqlx(rename = "preco")]
    pub price: f64,
    #[sqlx(rename = "media_num")]
    pub average: f64,
    #[sqlx(rename = "jogos_num")]
    pub games_played: i64,
    #[sqlx(rename = "score_mvp")]
    pub score: f64,
    #[sqlx(rename = "motivo")]
    pub rationale: String,
    pub updated_at: DateTime<Utc>,
}

/// Archived feed payload. The table is reserved; the ETL cycle does not write it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawCapture {
    pub id: i64,
    pub collected_at: DateTime<Utc>,
    pub payload: String,
}
