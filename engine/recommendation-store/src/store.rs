//! SQLite-backed recommendation store

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::models::{RawCapture, Recommendation};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

// Column names are shared with existing readers of the database
const CREATE_RECOMMENDATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS recommendations (
        player_id INTEGER PRIMARY KEY,
        apelido TEXT,
        clube_id INTEGER,
        escudo_url TEXT,
        foto_url TEXT,
        posicao_id INTEGER,
        preco REAL,
        media_num REAL,
        jogos_num INTEGER,
        score_mvp REAL,
        motivo TEXT,
        updated_at DATETIME
    )
"#;

const CREATE_RAW_SOURCE: &str = r#"
    CREATE TABLE IF NOT EXISTS raw_source (
        id INTEGER PRIMARY KEY,
        collected_at DATETIME,
        payload TEXT
    )
"#;

/// Single-writer handle on the recommendations database.
///
/// Every write runs in SQLite autocommit mode, so each upsert is durable on its
/// own and a crash mid-cycle keeps every row written before it.
pub struct RecommendationStore {
    config: StoreConfig,
    pool: SqlitePool,
}

impl RecommendationStore {
    /// Open (creating if needed) the database described by `config`
    pub async fn open(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::config)?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let journal_mode =
            if config.wal_mode { SqliteJournalMode::Wal } else { SqliteJournalMode::Delete };
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(journal_mode)
            .busy_timeout(config.busy_timeout());

        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

        debug!("Opened recommendation store at {:?}", config.path);
        Ok(Self { config, pool })
    }

    /// Create the recommendations and raw_source tables if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_RECOMMENDATIONS).execute(&self.pool).await?;
        sqlx::query(CREATE_RAW_SOURCE).execute(&self.pool).await?;

        info!("Schema ready at {:?}", self.config.path);
        Ok(())
    }

    /// Insert a recommendation, or overwrite the existing row for the same player
    pub async fn upsert(&self, rec: &Recommendation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recommendations (
                player_id, apelido, clube_id, escudo_url, foto_url, posicao_id,
                preco, media_num, jogos_num, score_mvp, motivo, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (player_id) DO UPDATE SET
                apelido = excluded.apelido,
                clube_id = excluded.clube_id,
                escudo_url = excluded.escudo_url,
                foto_url = excluded.foto_url,
                posicao_id = excluded.posicao_id,
                preco = excluded.preco,
                media_num = excluded.media_num,
                jogos_num = excluded.jogos_num,
                score_mvp = excluded.score_mvp,
                motivo = excluded.motivo,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(rec.player_id)
        .bind(&rec.nickname)
        .bind(rec.club_id)
        .bind(&rec.badge_url)
        .bind(&rec.photo_url)
        .bind(rec.position_id)
        .bind(rec.price)
        .bind(rec.average)
        .bind(rec.games_played)
        .bind(rec.score)
        .bind(&rec.rationale)
        .bind(rec.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load the recommendation for one player
    pub async fn get(&self, player_id: i64) -> Result<Option<Recommendation>> {
        let rec = sqlx::query_as::<_, Recommendation>(
            "SELECT * FROM recommendations WHERE player_id = ?",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rec)
    }

    /// Highest-scoring recommendations first
    pub async fn list_top(&self, limit: u32) -> Result<Vec<Recommendation>> {
        let recs = sqlx::query_as::<_, Recommendation>(
            "SELECT * FROM recommendations ORDER BY score_mvp DESC, player_id ASC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(recs)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recommendations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Append an opaque payload to the raw capture table, returning its row id
    pub async fn append_raw_capture(&self, payload: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO raw_source (collected_at, payload) VALUES (?, ?)")
            .bind(Utc::now())
            .bind(payload)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent raw capture, if any
    pub async fn latest_raw_capture(&self) -> Result<Option<RawCapture>> {
        let capture = sqlx::query_as::<_, RawCapture>(
            "SELECT id, collected_at, payload FROM raw_source ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(capture)
    }

    pub async fn raw_capture_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM raw_source").fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Close the connection pool, flushing pending writes
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use tempfile::TempDir;

    fn fixed_time(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 30, 0).unwrap()
    }

    fn sample(player_id: i64, score: f64) -> Recommendation {
        Recommendation {
            player_id,
            nickname: format!("Player {player_id}"),
            club_id: 262,
            badge_url: "https://img.sofascore.com/api/v1/team/5981/image".to_string(),
            photo_url: "https://images.fotmob.com/image_resources/playerimages/1.png".to_string(),
            position_id: 5,
            price: 12.5,
            average: 6.25,
            games_played: 5,
            score,
            rationale: "Good Average".to_string(),
            updated_at: fixed_time(10),
        }
    }

    async fn open_store(temp_dir: &TempDir) -> RecommendationStore {
        let store = RecommendationStore::open(StoreConfig::new(temp_dir.path().join("test.db")))
            .await
            .unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("cartola.db");

        let store = RecommendationStore::open(StoreConfig::new(&path)).await.unwrap();
        store.ensure_schema().await.unwrap();
        store.close().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        store.upsert(&sample(1, 10.0)).await.unwrap();
        store.ensure_schema().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_reproduces_every_field() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        let rec = sample(42, 41.0);
        store.upsert(&rec).await.unwrap();

        assert_eq!(store.get(42).await.unwrap(), Some(rec));
        assert_eq!(store.get(43).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_same_record_twice_keeps_one_row() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        let rec = sample(7, 20.0);
        store.upsert(&rec).await.unwrap();
        store.upsert(&rec).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(7).await.unwrap(), Some(rec));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_derived_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        store.upsert(&sample(7, 20.0)).await.unwrap();

        let updated = Recommendation {
            badge_url: String::new(),
            photo_url: "https://s.sde.globo.com/media/organizations/7_220x220.png".to_string(),
            price: 14.0,
            score: 3.5,
            rationale: "Regular Option".to_string(),
            updated_at: fixed_time(18),
            ..sample(7, 20.0)
        };
        store.upsert(&updated).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(7).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_upsert_into_existing_collector_database() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecommendationStore::open(StoreConfig::new(temp_dir.path().join("cartola.db")))
            .await
            .unwrap();

        // layout written by the earlier collector, with one of its rows
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS raw_source (id INTEGER PRIMARY KEY, collected_at DATETIME, payload TEXT)",
        )
        .execute(&store.pool)
        .await
        .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recommendations (
                player_id INTEGER PRIMARY KEY, apelido TEXT, clube_id INTEGER, escudo_url TEXT, foto_url TEXT,
                posicao_id INTEGER, preco REAL, media_num REAL, jogos_num INTEGER, score_mvp REAL, motivo TEXT, updated_at DATETIME
            )"#,
        )
        .execute(&store.pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO recommendations VALUES (7, 'Old', 262, '', '', 5, 9.0, 2.0, 4, 4.0, 'Opção Regular', '2026-03-01 09:15:02.123456')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        store.ensure_schema().await.unwrap();

        let rec = sample(7, 20.0);
        store.upsert(&rec).await.unwrap();
        store.upsert(&sample(8, 30.0)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get(7).await.unwrap(), Some(rec));

        let top: Vec<i64> =
            store.list_top(10).await.unwrap().into_iter().map(|r| r.player_id).collect();
        assert_eq!(top, vec![8, 7]);

        let legacy_columns: (String, f64, String) =
            sqlx::query_as("SELECT apelido, score_mvp, motivo FROM recommendations WHERE player_id = 8")
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(legacy_columns, ("Player 8".to_string(), 30.0, "Good Average".to_string()));
    }

    #[tokio::test]
    async fn test_list_top_orders_by_score() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        store.upsert(&sample(1, 5.0)).await.unwrap();
        store.upsert(&sample(2, 50.0)).await.unwrap();
        store.upsert(&sample(3, 25.0)).await.unwrap();

        let top: Vec<i64> =
            store.list_top(2).await.unwrap().into_iter().map(|r| r.player_id).collect();
        assert_eq!(top, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        let store = RecommendationStore::open(StoreConfig::new(&path)).await.unwrap();
        store.ensure_schema().await.unwrap();
        store.upsert(&sample(9, 9.0)).await.unwrap();
        store.close().await;

        let reopened = RecommendationStore::open(StoreConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.get(9).await.unwrap(), Some(sample(9, 9.0)));
    }

    #[tokio::test]
    async fn test_raw_capture_append_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir).await;

        assert_eq!(store.raw_capture_count().await.unwrap(), 0);
        assert!(store.latest_raw_capture().await.unwrap().is_none());

        let first = store.append_raw_capture(r#"{"atletas":[]}"#).await.unwrap();
        let second = store.append_raw_capture(r#"{"atletas":[1]}"#).await.unwrap();

        assert!(second > first);
        assert_eq!(store.raw_capture_count().await.unwrap(), 2);

        let latest = store.latest_raw_capture().await.unwrap().unwrap();
        assert_eq!(latest.id, second);
        assert_eq!(latest.payload, r#"{"atletas":[1]}"#);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
