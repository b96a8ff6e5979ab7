//! One collection cycle: fetch, filter, enrich, score, upsert.

use crate::badges::BadgeResolver;
use crate::config::FetcherConfig;
use crate::error::EtlError;
use crate::fetcher::SnapshotSource;
use crate::models::PlayerSnapshot;
use crate::photo::{PhotoLookup, PhotoResolution, PhotoResolver};
use crate::scoring::ScoreCalculator;
use chrono::{DateTime, Utc};
use recommendation_store::{Recommendation, RecommendationStore, StoreConfig};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of a completed (or interrupted) cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Players that passed the status filter
    pub eligible: usize,
    /// Players upserted into the store
    pub processed: usize,
    pub photos_resolved: usize,
    pub photos_fallback: usize,
    pub badges_missing: usize,
    /// Stopped early on shutdown
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CycleReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            eligible: 0,
            processed: 0,
            photos_resolved: 0,
            photos_fallback: 0,
            badges_missing: 0,
            interrupted: false,
            started_at,
            finished_at: started_at,
        }
    }
}

/// Keep players with `status_id`, most expensive first
pub fn select_eligible(players: &[PlayerSnapshot], status_id: i64) -> Vec<&PlayerSnapshot> {
    let mut eligible: Vec<&PlayerSnapshot> =
        players.iter().filter(|p| p.status_id == status_id).collect();
    eligible.sort_by(|a, b| b.price.total_cmp(&a.price));
    eligible
}

/// Orchestrates a single ETL pass
pub struct EtlCycle {
    source: Arc<dyn SnapshotSource>,
    photos: PhotoResolver,
    badges: BadgeResolver,
    scorer: ScoreCalculator,
    store_config: StoreConfig,
    eligible_status_id: i64,
    photo_pacing: Duration,
    fallback_size_token: String,
    fallback_size: String,
}

impl EtlCycle {
    pub fn new(
        config: &FetcherConfig,
        source: Arc<dyn SnapshotSource>,
        lookup: Arc<dyn PhotoLookup>,
    ) -> Self {
        Self {
            source,
            photos: PhotoResolver::new(
                lookup,
                config.photos.image_url_template.clone(),
                config.photo_timeout(),
            ),
            badges: BadgeResolver::new(
                config.badges.clubs.clone(),
                config.badges.url_template.clone(),
            ),
            scorer: ScoreCalculator::new(config.scoring.clone()),
            store_config: config.store.clone(),
            eligible_status_id: config.feed.eligible_status_id,
            photo_pacing: config.photo_pacing(),
            fallback_size_token: config.photos.fallback_size_token.clone(),
            fallback_size: config.photos.fallback_size.clone(),
        }
    }

    pub fn store_config(&self) -> &StoreConfig {
        &self.store_config
    }

    /// Run the cycle once.
    ///
    /// A fetch failure returns before the store is opened. Any store error aborts
    /// the remaining players; rows already upserted stay committed.
    pub async fn run(&self, shutdown: &CancellationToken) -> Result<CycleReport, EtlError> {
        let mut report = CycleReport::new(Utc::now());
        info!("Starting collection cycle");

        let snapshot = self.source.fetch_snapshot().await?;

        let players = select_eligible(&snapshot.players, self.eligible_status_id);
        report.eligible = players.len();
        info!(
            "Resolving photos for {} of {} players (status {})",
            players.len(),
            snapshot.players.len(),
            self.eligible_status_id
        );

        let store = RecommendationStore::open(self.store_config.clone()).await?;
        let result = self.process_players(&store, &players, shutdown, &mut report).await;
        store.close().await;
        result?;

        report.finished_at = Utc::now();
        info!(
            "Cycle finished: {} processed, {} photos resolved, {} fallbacks, {} clubs without badge",
            report.processed, report.photos_resolved, report.photos_fallback, report.badges_missing
        );
        Ok(report)
    }

    async fn process_players(
        &self,
        store: &RecommendationStore,
        players: &[&PlayerSnapshot],
        shutdown: &CancellationToken,
        report: &mut CycleReport,
    ) -> Result<(), EtlError> {
        let total = players.len();

        for (i, player) in players.iter().enumerate() {
            if shutdown.is_cancelled() {
                warn!("Shutdown requested, stopping cycle after {}/{} players", i, total);
                report.interrupted = true;
                break;
            }

            info!("Processing {}/{}: {}", i + 1, total, player.nickname);

            let rec = self.build_recommendation(player, report).await;
            store.upsert(&rec).await?;
            report.processed += 1;
        }

        Ok(())
    }

    /// Enrich and score one player
    async fn build_recommendation(
        &self,
        player: &PlayerSnapshot,
        report: &mut CycleReport,
    ) -> Recommendation {
        let resolution = self.photos.resolve(&player.nickname).await;
        if resolution.is_resolved() {
            report.photos_resolved += 1;
            tokio::time::sleep(self.photo_pacing).await;
        } else {
            report.photos_fallback += 1;
        }
        let photo_url = self.photo_url(player, resolution);

        let badge_url = self.badges.badge_url(player.club_id);
        if badge_url.is_empty() {
            report.badges_missing += 1;
        }

        let card = self.scorer.score(player);

        Recommendation {
            player_id: player.player_id,
            nickname: player.nickname.clone(),
            club_id: player.club_id,
            badge_url,
            photo_url,
            position_id: player.position_id,
            price: player.price,
            average: player.average,
            games_played: player.games_played,
            score: card.score,
            rationale: card.rationale,
            updated_at: Utc::now(),
        }
    }

    fn photo_url(&self, player: &PlayerSnapshot, resolution: PhotoResolution) -> String {
        resolution.url_or_else(|| {
            player.fallback_photo_url(&self.fallback_size_token, &self.fallback_size)
        })
    }
}
