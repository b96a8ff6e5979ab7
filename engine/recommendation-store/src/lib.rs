//! # Recommendation Store
//!
//! Embedded SQLite storage for the scored player recommendations produced by the
//! scout fetcher, plus the reserved raw-capture table.
//!
//! ## Tables
//!
//! - **recommendations**: one row per player identity, overwritten on every cycle
//! - **raw_source**: append-only slot for archived feed payloads
//!
//! ## Usage
//!
//! ```rust,no_run
//! use recommendation_store::{RecommendationStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RecommendationStore::open(StoreConfig::new("data/cartola.db")).await?;
//!     store.ensure_schema().await?;
//!
//!     for rec in store.list_top(10).await? {
//!         println!("{} -> {:.1} ({})", rec.nickname, rec.score, rec.rationale);
//!     }
//!
//!     store.close().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use models::{RawCapture, Recommendation};
pub use store::RecommendationStore;

/// Re-export common types for convenience
pub use chrono::{DateTime, Utc};
