use crate::badges::ClubBadgeMap;
use crate::models::PROBABLE_STATUS_ID;
use anyhow::Context;
use config::{Config, Environment, File};
use recommendation_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the Scout Fetcher service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Cartola market feed
    pub feed: FeedConfig,

    /// Player photo lookup
    pub photos: PhotoConfig,

    /// Club badge mapping
    pub badges: BadgeConfig,

    /// Scoring weights and thresholds
    pub scoring: ScoringConfig,

    /// Cycle scheduling
    pub scheduler: SchedulerConfig,

    /// Recommendation store
    pub store: StoreConfig,

    /// Logging
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Market snapshot endpoint
    pub url: String,

    /// Browser-identifying User-Agent sent to every external service
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Only players with this status are scored (7 = probable starter)
    pub eligible_status_id: i64,
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoConfig {
    /// Name search endpoint; the player name goes in the `term` query parameter
    pub search_url: String,

    /// Image URL template, `{id}` is replaced by the suggestion identifier
    pub image_url_template: String,

    /// Per-lookup timeout in milliseconds
    pub timeout_ms: u64,

    /// Pause after a resolved photo, in milliseconds
    pub pacing_ms: u64,

    /// Token in the feed's photo URL that selects the image size
    pub fallback_size_token: String,

    /// Size substituted into the feed's photo URL
    pub fallback_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Badge URL template, `{id}` is replaced by the provider club id
    pub url_template: String,

    /// Cartola club id -> badge provider club id
    #[serde(skip)]
    pub clubs: ClubBadgeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub goal_weight: f64,
    pub assist_weight: f64,
    pub shot_on_target_weight: f64,
    pub shot_off_target_weight: f64,
    pub tackle_weight: f64,
    pub average_weight: f64,

    /// Players with fewer games than this get `small_sample_factor`
    pub min_games: i64,
    pub small_sample_factor: f64,

    /// Rationale thresholds (strictly greater than)
    pub good_average_threshold: f64,
    pub top_scorer_goals: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Time between the end of one cycle and the start of the next, in seconds
    pub interval_secs: u64,

    /// Stop after the first cycle instead of sleeping
    pub run_once: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig {
                url: "https://api.cartola.globo.com/atletas/mercado".to_string(),
                user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36".to_string(),
                timeout_secs: 30,
                eligible_status_id: PROBABLE_STATUS_ID,
            },
            photos: PhotoConfig {
                search_url: "https://apigw.fotmob.com/searchapi/suggest".to_string(),
                image_url_template: "https://images.fotmob.com/image_resources/playerimages/{id}.png"
                    .to_string(),
                timeout_ms: 2_000,
                pacing_ms: 100,
                fallback_size_token: "FORMATO".to_string(),
                fallback_size: "220x220".to_string(),
            },
            badges: BadgeConfig {
                url_template: "https://img.sofascore.com/api/v1/team/{id}/image".to_string(),
                clubs: ClubBadgeMap::default(),
            },
            scoring: ScoringConfig::default(),
            scheduler: SchedulerConfig { interval_secs: 8 * 3600, run_once: false },
            store: StoreConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: "pretty".to_string() },
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            goal_weight: 8.0,
            assist_weight: 5.0,
            shot_on_target_weight: 1.2,
            shot_off_target_weight: 0.8,
            tackle_weight: 1.5,
            average_weight: 2.0,
            min_games: 3,
            small_sample_factor: 0.5,
            good_average_threshold: 5.0,
            top_scorer_goals: 2.0,
        }
    }
}

impl FetcherConfig {
    /// Layer defaults, an optional TOML file and `SCOUT__*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `SCOUT__SCHEDULER__INTERVAL_SECS=60`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .add_source(Config::try_from(&defaults).context("Failed to encode default config")?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let mut config: Self = builder
            .add_source(Environment::with_prefix("SCOUT").separator("__").try_parsing(true))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // the club table is not part of the layered sources
        config.badges.clubs = defaults.badges.clubs;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scheduler.interval_secs == 0 {
            anyhow::bail!("scheduler.interval_secs must be greater than zero");
        }

        if self.photos.timeout_ms == 0 {
            anyhow::bail!("photos.timeout_ms must be greater than zero");
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        self.store.validate().map_err(|e| anyhow::anyhow!("Invalid store config: {e}"))?;

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }

    pub fn photo_timeout(&self) -> Duration {
        Duration::from_millis(self.photos.timeout_ms)
    }

    pub fn photo_pacing(&self) -> Duration {
        Duration::from_millis(self.photos.pacing_ms)
    }

}
