//! Cartola Scout Fetcher
//!
//! Periodically pulls the Cartola player market, resolves a photo and a club badge
//! for every probable starter, scores each player and upserts the result into the
//! recommendation store. Runs one cycle at startup and then every eight hours.

pub mod badges;
pub mod config;
pub mod error;
pub mod etl;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod photo;
pub mod scheduler;
pub mod scoring;
pub mod signals;


pub use badges::{BadgeResolver, ClubBadgeMap};
pub use config::FetcherConfig;
pub use error::{EtlError, FetchError};
pub use etl::{CycleReport, EtlCycle};
pub use fetcher::{MarketFeedClient, SnapshotSource};
pub use logging::initialize_logging;
pub use models::*;
pub use photo::{HttpPhotoLookup, PhotoLookup, PhotoResolution, PhotoResolver, PhotoSuggestion};
pub use scheduler::{FetcherScheduler, SchedulerState};
pub use scoring::{ScoreCalculator, ScoreCard};
pub use signals::setup_signal_handlers;

pub use tokio_util::sync::CancellationToken;
