//! Player photo resolution
//!
//! Photos come from a name-search service. A lookup is best effort: errors,
//! timeouts and empty results all end up as [`PhotoResolution::Unresolved`] and
//! the caller falls back to the photo carried by the market feed.

use crate::config::PhotoConfig;
use crate::error::FetchError;
use crate::models::null_as_default;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One suggestion returned by the name search
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhotoSuggestion {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(rename = "squadMemberSuggest", default, deserialize_with = "null_as_default")]
    squad_member_suggest: Vec<PhotoSuggestion>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl PhotoSuggestion {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

/// Name search against a photo provider
#[async_trait]
pub trait PhotoLookup: Send + Sync {
    async fn search(&self, name: &str) -> Result<Vec<PhotoSuggestion>, FetchError>;
}

/// reqwest-backed [`PhotoLookup`]
pub struct HttpPhotoLookup {
    client: Client,
    search_url: String,
}

impl HttpPhotoLookup {
    pub fn new(config: &PhotoConfig, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, search_url: config.search_url.clone() })
    }
}

#[async_trait]
impl PhotoLookup for HttpPhotoLookup {
    async fn search(&self, name: &str) -> Result<Vec<PhotoSuggestion>, FetchError> {
        let response = self.client.get(&self.search_url).query(&[("term", name)]).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: SuggestResponse = serde_json::from_str(&body)?;
        Ok(parsed.squad_member_suggest)
    }
}

/// Outcome of a photo lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoResolution {
    Resolved(String),
    Unresolved(UnresolvedReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedReason {
    NoSuggestions,
    MissingIdentifier,
    Timeout,
    Lookup(String),
}

impl PhotoResolution {
    /// Resolved URL, or the fallback produced by `fallback`
    pub fn url_or_else(self, fallback: impl FnOnce() -> String) -> String {
        match self {
            PhotoResolution::Resolved(url) => url,
            PhotoResolution::Unresolved(_) => fallback(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PhotoResolution::Resolved(_))
    }
}

/// Turns a player name into an image URL through a [`PhotoLookup`]
#[derive(Clone)]
pub struct PhotoResolver {
    lookup: Arc<dyn PhotoLookup>,
    image_url_template: String,
    timeout: Duration,
}

impl PhotoResolver {
    pub fn new(lookup: Arc<dyn PhotoLookup>, image_url_template: impl Into<String>, timeout: Duration) -> Self {
        Self { lookup, image_url_template: image_url_template.into(), timeout }
    }

    /// Resolve a photo for `name`. Never fails; the first suggestion wins.
    pub async fn resolve(&self, name: &str) -> PhotoResolution {
        let suggestions = match tokio::time::timeout(self.timeout, self.lookup.search(name)).await {
            Ok(Ok(suggestions)) => suggestions,
            Ok(Err(e)) => {
                debug!("Photo lookup for {} failed: {}", name, e);
                return PhotoResolution::Unresolved(UnresolvedReason::Lookup(e.to_string()));
            }
            Err(_) => {
                debug!("Photo lookup for {} timed out after {:?}", name, self.timeout);
                return PhotoResolution::Unresolved(UnresolvedReason::Timeout);
            }
        };

        match suggestions.into_iter().next() {
            None => PhotoResolution::Unresolved(UnresolvedReason::NoSuggestions),
            Some(PhotoSuggestion { id: Some(id) }) => {
                PhotoResolution::Resolved(self.image_url_template.replace("{id}", &id))
            }
            Some(PhotoSuggestion { id: None }) => {
                PhotoResolution::Unresolved(UnresolvedReason::MissingIdentifier)
            }
        }
    }
}
